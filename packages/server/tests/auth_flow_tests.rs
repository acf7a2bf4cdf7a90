//! End-to-end tests for the OTP and Google sign-in flows.
//!
//! Every external collaborator (mail, Google verification, user storage,
//! the clock) is mocked, so the tests drive the domain actions exactly as
//! the HTTP handlers do - no database or network required.

use api_core::common::AuthError;
use api_core::domains::auth::actions::{
    google_login, request_otp, verify_otp, GoogleLogin, RequestOtp, VerifyOtp,
};
use api_core::domains::auth::JwtService;
use api_core::kernel::test_dependencies::{InMemoryUserStore, MockGoogleVerifier, MockMailer};
use api_core::kernel::{BaseClock, GoogleClaims, TestDependencies};
use chrono::Duration;

// ============================================================================
// Test Helpers
// ============================================================================

fn signup_request(email: &str) -> RequestOtp {
    RequestOtp {
        email: email.to_string(),
        signup: true,
        name: Some("Ann".to_string()),
        dob: Some("2000-01-01".to_string()),
    }
}

fn login_request(email: &str) -> RequestOtp {
    RequestOtp {
        email: email.to_string(),
        signup: false,
        name: None,
        dob: None,
    }
}

fn verify_request(email: &str, code: &str) -> VerifyOtp {
    VerifyOtp {
        email: email.to_string(),
        code: code.to_string(),
        name: None,
        dob: None,
    }
}

fn signup_verify_request(email: &str, code: &str) -> VerifyOtp {
    VerifyOtp {
        email: email.to_string(),
        code: code.to_string(),
        name: Some("Ann".to_string()),
        dob: Some("2000-01-01".to_string()),
    }
}

/// Pull the 6-digit code out of a captured mail body.
fn code_in(body: &str) -> String {
    body.split(|c: char| !c.is_ascii_digit())
        .find(|segment| segment.len() == 6)
        .expect("Mail body should contain a 6-digit code")
        .to_string()
}

fn last_sent_code(mailer: &MockMailer) -> String {
    code_in(&mailer.last_body().expect("A mail should have been sent"))
}

fn google_claims() -> GoogleClaims {
    GoogleClaims {
        subject: "google-subject-1".to_string(),
        email: Some("ann@example.com".to_string()),
        name: Some("Ann".to_string()),
    }
}

// ============================================================================
// Signup / login flows
// ============================================================================

#[tokio::test]
async fn test_signup_flow_creates_user_and_allows_login() {
    let harness = TestDependencies::new();
    let deps = harness.clone().into_deps();

    // Request a signup challenge
    request_otp(signup_request("a@x.com"), &deps).await.unwrap();
    assert!(harness.mailer.was_sent_to("a@x.com"));

    // Verify with the delivered code
    let code = last_sent_code(&harness.mailer);
    let session = verify_otp(signup_verify_request("a@x.com", &code), &deps)
        .await
        .unwrap();

    assert_eq!(session.user.email, "a@x.com");
    assert_eq!(session.user.name, "Ann");
    assert_eq!(harness.users.count(), 1);

    // The token carries the user it was minted for
    let jwt = JwtService::new("test_secret_key", "test_issuer".to_string());
    let claims = jwt.verify_token(&session.token).unwrap();
    assert_eq!(claims.user_id, session.user.id);
    assert_eq!(claims.email, "a@x.com");

    // The identity is now registered, so a login challenge succeeds
    request_otp(login_request("a@x.com"), &deps).await.unwrap();
}

#[tokio::test]
async fn test_signup_conflict_for_registered_email() {
    let harness = TestDependencies::new()
        .mock_users(InMemoryUserStore::new().with_user("ann@example.com", "Ann"));
    let deps = harness.clone().into_deps();

    let err = request_otp(signup_request("ann@example.com"), &deps)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Conflict));

    // Conflict wins regardless of what profile fields were supplied
    let bare = RequestOtp {
        email: "ann@example.com".to_string(),
        signup: true,
        name: None,
        dob: None,
    };
    let err = request_otp(bare, &deps).await.unwrap_err();
    assert!(matches!(err, AuthError::Conflict));

    assert_eq!(harness.mailer.send_count(), 0, "No challenge should go out");
}

#[tokio::test]
async fn test_login_for_unknown_email_is_not_found() {
    let deps = TestDependencies::new().into_deps();

    let err = request_otp(login_request("ghost@example.com"), &deps)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::NotFound));
}

#[tokio::test]
async fn test_signup_without_profile_fields_is_rejected() {
    let deps = TestDependencies::new().into_deps();

    let missing_dob = RequestOtp {
        email: "a@x.com".to_string(),
        signup: true,
        name: Some("Ann".to_string()),
        dob: None,
    };
    let err = request_otp(missing_dob, &deps).await.unwrap_err();
    assert!(matches!(err, AuthError::Validation(_)));
}

#[tokio::test]
async fn test_malformed_email_is_rejected() {
    let deps = TestDependencies::new().into_deps();

    let err = request_otp(login_request("not-an-email"), &deps)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Validation(_)));
}

// ============================================================================
// Challenge lifecycle
// ============================================================================

#[tokio::test]
async fn test_second_challenge_invalidates_first() {
    let harness = TestDependencies::new()
        .mock_users(InMemoryUserStore::new().with_user("ann@example.com", "Ann"));
    let deps = harness.clone().into_deps();

    request_otp(login_request("ann@example.com"), &deps)
        .await
        .unwrap();
    let first_code = last_sent_code(&harness.mailer);

    request_otp(login_request("ann@example.com"), &deps)
        .await
        .unwrap();
    let second_code = last_sent_code(&harness.mailer);
    assert_ne!(
        first_code, second_code,
        "Second challenge should carry a fresh code"
    );

    // The first code no longer matches anything live
    let err = verify_otp(verify_request("ann@example.com", &first_code), &deps)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCode));

    // And the attempt consumed the live challenge too
    let err = verify_otp(verify_request("ann@example.com", &second_code), &deps)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCode));
}

#[tokio::test]
async fn test_challenge_is_single_use() {
    let harness = TestDependencies::new()
        .mock_users(InMemoryUserStore::new().with_user("ann@example.com", "Ann"));
    let deps = harness.clone().into_deps();

    request_otp(login_request("ann@example.com"), &deps)
        .await
        .unwrap();
    let code = last_sent_code(&harness.mailer);

    verify_otp(verify_request("ann@example.com", &code), &deps)
        .await
        .unwrap();

    // Replaying the same code fails
    let err = verify_otp(verify_request("ann@example.com", &code), &deps)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCode));
}

#[tokio::test]
async fn test_wrong_code_is_invalid() {
    let harness = TestDependencies::new()
        .mock_users(InMemoryUserStore::new().with_user("ann@example.com", "Ann"));
    let deps = harness.clone().into_deps();

    let expires_at = harness.clock.now() + Duration::minutes(5);
    harness.otp_store.put("ann@example.com", "123456", expires_at);

    let err = verify_otp(verify_request("ann@example.com", "000000"), &deps)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCode));
}

#[tokio::test]
async fn test_expired_challenge() {
    let harness = TestDependencies::new()
        .mock_users(InMemoryUserStore::new().with_user("ann@example.com", "Ann"));
    let deps = harness.clone().into_deps();

    request_otp(login_request("ann@example.com"), &deps)
        .await
        .unwrap();
    let code = last_sent_code(&harness.mailer);

    // Past the 5-minute window
    harness.clock.advance(Duration::minutes(6));

    let err = verify_otp(verify_request("ann@example.com", &code), &deps)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Expired));

    // Expiry detection consumed the challenge
    let err = verify_otp(verify_request("ann@example.com", &code), &deps)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCode));
}

#[tokio::test]
async fn test_delivery_failure_keeps_challenge_live() {
    let harness = TestDependencies::new()
        .mock_mailer(MockMailer::failing())
        .mock_users(InMemoryUserStore::new().with_user("ann@example.com", "Ann"));
    let deps = harness.clone().into_deps();

    let err = request_otp(login_request("ann@example.com"), &deps)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::DeliveryFailed));

    // The store write was not rolled back: the code from the failed
    // delivery attempt still verifies.
    let code = last_sent_code(&harness.mailer);
    verify_otp(verify_request("ann@example.com", &code), &deps)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_email_is_case_normalized() {
    let harness = TestDependencies::new()
        .mock_users(InMemoryUserStore::new().with_user("ann@example.com", "Ann"));
    let deps = harness.clone().into_deps();

    request_otp(login_request("Ann@Example.COM"), &deps)
        .await
        .unwrap();
    let code = last_sent_code(&harness.mailer);

    // Mixed-case verify hits the same challenge
    let session = verify_otp(verify_request(" ann@EXAMPLE.com ", &code), &deps)
        .await
        .unwrap();
    assert_eq!(session.user.email, "ann@example.com");
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_concurrent_verify_has_exactly_one_winner() {
    let harness = TestDependencies::new()
        .mock_users(InMemoryUserStore::new().with_user("ann@example.com", "Ann"));
    let deps = harness.clone().into_deps();

    let expires_at = harness.clock.now() + Duration::minutes(5);
    harness.otp_store.put("ann@example.com", "123456", expires_at);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let deps = deps.clone();
            tokio::spawn(async move {
                verify_otp(verify_request("ann@example.com", "123456"), &deps).await
            })
        })
        .collect();

    let mut verified = 0;
    let mut invalid = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => verified += 1,
            Err(AuthError::InvalidCode) => invalid += 1,
            Err(other) => panic!("Unexpected outcome: {other}"),
        }
    }

    assert_eq!(verified, 1, "Exactly one attempt should win");
    assert_eq!(invalid, 7, "Losers should observe an invalid code");
}

// ============================================================================
// Google sign-in
// ============================================================================

#[tokio::test]
async fn test_google_login_is_idempotent() {
    let harness = TestDependencies::new()
        .mock_google(MockGoogleVerifier::new().with_claims(google_claims()));
    let deps = harness.clone().into_deps();

    let first = google_login(
        GoogleLogin {
            id_token: "token-1".to_string(),
        },
        &deps,
    )
    .await
    .unwrap();

    let second = google_login(
        GoogleLogin {
            id_token: "token-2".to_string(),
        },
        &deps,
    )
    .await
    .unwrap();

    assert_eq!(first.user.id, second.user.id, "Same underlying account");
    assert_eq!(harness.users.count(), 1, "No duplicate user created");

    let jwt = JwtService::new("test_secret_key", "test_issuer".to_string());
    assert!(jwt.verify_token(&first.token).is_ok());
    assert!(jwt.verify_token(&second.token).is_ok());
}

#[tokio::test]
async fn test_google_login_attaches_to_existing_local_account() {
    let harness = TestDependencies::new()
        .mock_users(InMemoryUserStore::new().with_user("ann@example.com", "Ann"))
        .mock_google(MockGoogleVerifier::new().with_claims(google_claims()));
    let deps = harness.clone().into_deps();

    let existing_id = harness.users.get("ann@example.com").unwrap().id;

    let session = google_login(
        GoogleLogin {
            id_token: "token-1".to_string(),
        },
        &deps,
    )
    .await
    .unwrap();

    assert_eq!(session.user.id, existing_id);
    assert_eq!(harness.users.count(), 1);
    assert_eq!(
        harness.users.get("ann@example.com").unwrap().google_id,
        Some("google-subject-1".to_string())
    );
}

#[tokio::test]
async fn test_google_login_rejects_invalid_token() {
    // Verifier with no configured claims rejects everything
    let deps = TestDependencies::new().into_deps();

    let err = google_login(
        GoogleLogin {
            id_token: "bad-token".to_string(),
        },
        &deps,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AuthError::Unauthorized));
}

#[tokio::test]
async fn test_google_login_rejects_incomplete_claims() {
    let incomplete = GoogleClaims {
        subject: "google-subject-1".to_string(),
        email: None,
        name: Some("Ann".to_string()),
    };
    let harness =
        TestDependencies::new().mock_google(MockGoogleVerifier::new().with_claims(incomplete));
    let deps = harness.clone().into_deps();

    let err = google_login(
        GoogleLogin {
            id_token: "token-1".to_string(),
        },
        &deps,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AuthError::Unauthorized));
    assert_eq!(harness.users.count(), 0, "No account should be created");
}
