//! Profile and admin-read flow tests
//!
//! Identity-store lifecycle plus the aggregate reads behind the admin and
//! dashboard views. Every test skips cleanly when `TEST_DATABASE_URL` is not
//! exported.

mod helpers;

use assert_matches::assert_matches;
use serial_test::serial;

use festreg::database::EventRoster;
use festreg::models::event::EventType;
use festreg::models::profile::{CreateProfileRequest, UpdateProfileRequest};
use festreg::services::ProfileService;
use festreg::utils::errors::FestregError;

use helpers::database_helper::skip_notice;
use helpers::{test_data, TestContext};

fn profile_service(ctx: &TestContext) -> ProfileService {
    ProfileService::new(ctx.db.profiles.clone(), ctx.db.participants.clone())
}

fn sign_in_request(email: &str) -> CreateProfileRequest {
    CreateProfileRequest {
        name: "Asha Rao".to_string(),
        email: email.to_string(),
        phone: Some("+911234567890".to_string()),
        registration_number: None,
        course: Some("B.Tech".to_string()),
        year: Some("3".to_string()),
    }
}

#[tokio::test]
#[serial]
async fn test_first_sign_in_creates_profile_once() {
    let Some(ctx) = TestContext::new().await else {
        skip_notice("test_first_sign_in_creates_profile_once");
        return;
    };

    let profiles = profile_service(&ctx);
    let email = test_data::unique_email();

    let created = profiles.ensure_profile(sign_in_request(&email)).await.unwrap();
    assert_eq!(created.email, email);
    assert!(!created.is_admin);

    // a second sign-in returns the same row
    let again = profiles.ensure_profile(sign_in_request(&email)).await.unwrap();
    assert_eq!(again.id, created.id);
}

#[tokio::test]
#[serial]
async fn test_profile_update_keeps_unspecified_fields() {
    let Some(ctx) = TestContext::new().await else {
        skip_notice("test_profile_update_keeps_unspecified_fields");
        return;
    };

    let profiles = profile_service(&ctx);
    let email = test_data::unique_email();
    profiles.ensure_profile(sign_in_request(&email)).await.unwrap();

    let updated = profiles
        .update_profile(
            &email,
            UpdateProfileRequest {
                year: Some("4".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.year.as_deref(), Some("4"));
    assert_eq!(updated.course.as_deref(), Some("B.Tech"));
    assert_eq!(updated.name, "Asha Rao");
}

#[tokio::test]
#[serial]
async fn test_profile_with_registrations_cannot_be_deleted() {
    let Some(ctx) = TestContext::new().await else {
        skip_notice("test_profile_with_registrations_cannot_be_deleted");
        return;
    };

    let profiles = profile_service(&ctx);
    let data = test_data::participant_data();

    let profile = profiles.ensure_profile(sign_in_request(&data.email)).await.unwrap();

    let event = ctx
        .catalog_service()
        .create_event(test_data::open_event(EventType::Individual, 0))
        .await
        .unwrap();
    ctx.registration_service()
        .register_individual(event.id, data)
        .await
        .unwrap();

    let err = profiles.delete_profile(profile.id).await.unwrap_err();
    assert_matches!(err, FestregError::InvalidInput(_));

    // still present
    assert!(profiles.get_profile(&profile.email).await.unwrap().is_some());
}

#[tokio::test]
#[serial]
async fn test_event_roster_groups_teams_with_members() {
    let Some(ctx) = TestContext::new().await else {
        skip_notice("test_event_roster_groups_teams_with_members");
        return;
    };

    let event = ctx
        .catalog_service()
        .create_event(test_data::open_event(EventType::Team, 100))
        .await
        .unwrap();

    let data = test_data::team_data(3);
    let leader_email = data.participants[0].email.clone();
    let event_with_counts = ctx.db.events.find_with_counts(event.id).await.unwrap().unwrap();
    ctx.registration_service()
        .register_team(&event_with_counts, data, &leader_email)
        .await
        .unwrap();

    let roster = ctx.db.event_roster(event.id).await.unwrap();
    assert_matches!(roster, EventRoster::Team { teams, .. } => {
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].members.len(), 3);
        assert_eq!(teams[0].team.leader_email, leader_email);
    });
}

#[tokio::test]
#[serial]
async fn test_participations_power_the_dashboard() {
    let Some(ctx) = TestContext::new().await else {
        skip_notice("test_participations_power_the_dashboard");
        return;
    };

    let event = ctx
        .catalog_service()
        .create_event(test_data::open_event(EventType::Individual, 250))
        .await
        .unwrap();

    let data = test_data::participant_data();
    let email = data.email.clone();
    ctx.registration_service()
        .register_individual(event.id, data)
        .await
        .unwrap();

    let participations = ctx.db.participations_for(&email).await.unwrap();
    assert_eq!(participations.len(), 1);
    assert_eq!(participations[0].event.id, event.id);
    assert!(participations[0].team.is_none());
    assert_eq!(participations[0].participant.registration_fee, 250);
}

#[tokio::test]
#[serial]
async fn test_payments_overview_carries_payer_context() {
    let Some(ctx) = TestContext::new().await else {
        skip_notice("test_payments_overview_carries_payer_context");
        return;
    };

    let event = ctx
        .catalog_service()
        .create_event(test_data::open_event(EventType::Individual, 500))
        .await
        .unwrap();

    let data = test_data::participant_data();
    let participant_name = data.name.clone();
    let participant = ctx
        .registration_service()
        .register_individual(event.id, data)
        .await
        .unwrap();

    ctx.db
        .payments
        .record_and_mark_paid(festreg::models::payment::NewPayment {
            amount: 500,
            status: festreg::models::payment::PaymentStatus::Completed,
            provider_payment_id: Some(format!("ctx_{}", participant.id)),
            payment_method: Some("CASHFREE".to_string()),
            transaction_id: None,
            proof_image_url: None,
            paid_at: Some(chrono::Utc::now()),
            payer: festreg::models::payment::Payer::Participant(participant.id),
        })
        .await
        .unwrap();

    let (payments, total) = ctx.db.payments_overview(50, 0).await.unwrap();
    assert!(total >= 1);

    let ours = payments
        .iter()
        .find(|p| p.payment.participant_id == Some(participant.id))
        .expect("recorded payment should be listed");
    assert_eq!(ours.payer_name, participant_name);
    assert_eq!(ours.event_name, event.name);
}
