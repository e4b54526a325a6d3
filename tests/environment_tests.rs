use secure_rag_ui::config::{ConfigError, Environment};

#[test]
fn shipped_environment_loads() {
    let env = Environment::load().expect("embedded environment.toml must be valid");

    assert!(!env.api_url.ends_with('/'));
    assert!(env.chat_url().ends_with("/chat"));
    assert!(env.upload_url().ends_with("/upload"));
    assert_eq!(env.firebase.project_id, "secure-rag-demo");
}

#[test]
fn production_flavour_with_custom_identity_endpoint() {
    let raw = r#"
        production = true
        api_url = "https://rag.example.com/api/"

        [firebase]
        api_key = "prod-key"
        identity_url = "http://127.0.0.1:9099/identitytoolkit.googleapis.com/v1/"
    "#;
    let env = Environment::from_toml_str(raw).unwrap();

    assert!(env.production);
    assert_eq!(env.chat_url(), "https://rag.example.com/api/chat");
    assert_eq!(
        env.sign_in_url(),
        "http://127.0.0.1:9099/identitytoolkit.googleapis.com/v1/accounts:signInWithPassword?key=prod-key"
    );
}

#[test]
fn malformed_toml_is_reported() {
    let err = Environment::from_toml_str("api_url = ").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
    assert!(err.to_string().starts_with("Failed to parse environment"));
}
