use garrison::identity::{IdentityClient, ProfilePatch};
use garrison::utils::errors::IdentityError;
use garrison::utils::logger;

#[tokio::test]
async fn test_account_lifecycle() {
    logger::init_tracing();
    let identity = IdentityClient::new();

    let profile = identity
        .register("Helldiver1", "cadet@superearth.example", "liberty")
        .await
        .expect("register should succeed");
    assert_eq!(profile.username, "Helldiver1");
    assert!(!profile.uid.is_empty());

    //Registering signs the session in
    assert_eq!(identity.current_user().await, Some(profile.clone()));

    identity.logout().await;
    identity.logout().await;
    assert_eq!(identity.current_user().await, None);

    let back = identity
        .login("cadet@superearth.example", "liberty")
        .await
        .expect("login should succeed");
    assert_eq!(back.uid, profile.uid);

    let updated = identity
        .update_profile(ProfilePatch {
            username: Some("Helldiver2".to_string()),
            email: None,
        })
        .await
        .expect("profile update should succeed");
    assert_eq!(updated.username, "Helldiver2");
    assert_eq!(updated.email, profile.email);

    identity
        .delete_account()
        .await
        .expect("delete should succeed");
    assert_eq!(identity.current_user().await, None);
    let result = identity.login("cadet@superearth.example", "liberty").await;
    assert_eq!(result, Err(IdentityError::InvalidCredentials));
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    logger::init_tracing();
    let identity = IdentityClient::new();
    identity
        .register("Helldiver1", "cadet@superearth.example", "liberty")
        .await
        .expect("first register should succeed");

    let result = identity
        .register("Impostor", "cadet@superearth.example", "tyranny")
        .await;
    assert_eq!(
        result,
        Err(IdentityError::EmailTaken("cadet@superearth.example".to_string()))
    );
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    logger::init_tracing();
    let identity = IdentityClient::new();
    identity
        .register("Helldiver1", "cadet@superearth.example", "liberty")
        .await
        .expect("register should succeed");
    identity.logout().await;

    let result = identity.login("cadet@superearth.example", "wrong").await;
    assert_eq!(result, Err(IdentityError::InvalidCredentials));

    let result = identity.login("nobody@superearth.example", "liberty").await;
    assert_eq!(result, Err(IdentityError::InvalidCredentials));
}

#[tokio::test]
async fn test_account_actions_require_a_session() {
    logger::init_tracing();
    let identity = IdentityClient::new();

    let result = identity
        .update_profile(ProfilePatch {
            username: Some("Nobody".to_string()),
            email: None,
        })
        .await;
    assert_eq!(result, Err(IdentityError::NotSignedIn));

    let result = identity.delete_account().await;
    assert_eq!(result, Err(IdentityError::NotSignedIn));
}

#[tokio::test]
async fn test_profile_email_must_stay_unique() {
    logger::init_tracing();
    let identity = IdentityClient::new();
    identity
        .register("Helldiver1", "one@superearth.example", "liberty")
        .await
        .expect("register should succeed");
    identity
        .register("Helldiver2", "two@superearth.example", "liberty")
        .await
        .expect("register should succeed");

    //Second registration holds the session; moving onto the first's email fails
    let result = identity
        .update_profile(ProfilePatch {
            username: None,
            email: Some("one@superearth.example".to_string()),
        })
        .await;
    assert_eq!(
        result,
        Err(IdentityError::EmailTaken("one@superearth.example".to_string()))
    );

    //Re-asserting your own email is not a collision
    let result = identity
        .update_profile(ProfilePatch {
            username: None,
            email: Some("two@superearth.example".to_string()),
        })
        .await;
    assert!(result.is_ok());
}
