use clinic_notify_core::{
    generate_internal_token, ClientPatch, DataStore, MessageTemplate, NewClient, StoreError,
    TemplatesInput,
};
use rusqlite::types::Value;
use rusqlite::Connection;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn create_and_get_roundtrip_by_id_and_token() {
    let (_dir, store) = temp_store();
    let templates = sample_templates();

    let id = store
        .create_client(new_client("12345", "token-a", templates.clone()))
        .unwrap();

    let by_id = store.get_client_by_id(id).unwrap().unwrap();
    assert_eq!(by_id.id, id);
    assert_eq!(by_id.name, "Clínica Central");
    assert_eq!(by_id.business_id, "12345");
    assert_eq!(by_id.provider_sender_address, "whatsapp:+14155238886");
    assert_eq!(by_id.templates, templates);
    assert!(!by_id.created_at.is_empty());

    let by_token = store.get_client_by_token("token-a").unwrap().unwrap();
    assert_eq!(by_token, by_id);
}

#[test]
fn pre_encoded_templates_are_stored_verbatim() {
    let (dir, store) = temp_store();
    let raw = r#"[{"name":"lembrete","content_sid":"HX9"}]"#;

    let mut client = new_client("999", "token-raw", Vec::new());
    client.templates = TemplatesInput::from(raw);
    let id = store.create_client(client).unwrap();

    let stored: String = raw_conn(&dir)
        .query_row(
            "SELECT twilio_templates FROM clients WHERE id = ?1;",
            [id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(stored, raw);

    let loaded = store.get_client_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.templates[0].name, "lembrete");
    assert_eq!(loaded.templates[0].attributes["content_sid"], "HX9");
}

#[test]
fn stored_list_of_template_names_reads_back() {
    let (_dir, store) = temp_store();

    let mut client = new_client("888", "token-names", Vec::new());
    client.templates = TemplatesInput::from(r#"["lembrete_consulta","confirmacao"]"#);
    let id = store.create_client(client).unwrap();

    let loaded = store.get_client_by_id(id).unwrap().unwrap();
    assert_eq!(
        loaded.templates,
        vec![
            MessageTemplate::named("lembrete_consulta"),
            MessageTemplate::named("confirmacao"),
        ]
    );
    assert_eq!(
        store.get_client_by_token("token-names").unwrap().unwrap(),
        loaded
    );
}

#[test]
fn duplicate_business_id_or_token_is_rejected() {
    let (_dir, store) = temp_store();
    let first = store
        .create_client(new_client("12345", "token-a", sample_templates()))
        .unwrap();

    let same_business_id = store
        .create_client(new_client("12345", "token-b", Vec::new()))
        .unwrap_err();
    assert!(matches!(same_business_id, StoreError::DuplicateKey));

    let same_token = store
        .create_client(new_client("67890", "token-a", Vec::new()))
        .unwrap_err();
    assert!(matches!(same_token, StoreError::DuplicateKey));

    let untouched = store.get_client_by_id(first).unwrap().unwrap();
    assert_eq!(untouched.business_id, "12345");
    assert_eq!(untouched.internal_token, "token-a");
    assert!(store.get_client_by_token("token-b").unwrap().is_none());
}

#[test]
fn missing_client_lookups_return_none() {
    let (_dir, store) = temp_store();
    assert!(store.get_client_by_id(42).unwrap().is_none());
    assert!(store.get_client_by_token("nope").unwrap().is_none());
}

#[test]
fn malformed_templates_surface_as_malformed_data() {
    let (dir, store) = temp_store();

    let mut client = new_client("111", "token-bad", Vec::new());
    client.templates = TemplatesInput::from("not-json");
    let bad_id = store.create_client(client).unwrap();
    let err = store.get_client_by_id(bad_id).unwrap_err();
    assert!(matches!(err, StoreError::MalformedData(_)));

    let good_id = store
        .create_client(new_client("222", "token-good", sample_templates()))
        .unwrap();
    raw_conn(&dir)
        .execute(
            "UPDATE clients SET twilio_templates = '{\"name\":\"single\"}' WHERE id = ?1;",
            [good_id],
        )
        .unwrap();
    let err = store.get_client_by_token("token-good").unwrap_err();
    assert!(matches!(err, StoreError::MalformedData(_)));
}

#[test]
fn empty_patch_is_noop_and_leaves_row_identical() {
    let (dir, store) = temp_store();
    let id = store
        .create_client(new_client("12345", "token-a", sample_templates()))
        .unwrap();
    let before = client_row(&dir, id);

    assert!(!store.update_client(id, ClientPatch::default()).unwrap());
    assert!(!store.update_client(9999, ClientPatch::default()).unwrap());

    assert_eq!(client_row(&dir, id), before);
}

#[test]
fn patch_updates_only_given_fields() {
    let (_dir, store) = temp_store();
    let id = store
        .create_client(new_client("12345", "token-a", sample_templates()))
        .unwrap();
    let new_templates = vec![MessageTemplate::named("cancelamento")];

    let patch = ClientPatch {
        name: Some("Clínica Norte".to_string()),
        templates: Some(TemplatesInput::List(new_templates.clone())),
        ..ClientPatch::default()
    };
    assert!(store.update_client(id, patch).unwrap());

    let loaded = store.get_client_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.name, "Clínica Norte");
    assert_eq!(loaded.templates, new_templates);
    assert_eq!(loaded.business_id, "12345");
    assert_eq!(loaded.internal_token, "token-a");
    assert_eq!(loaded.provider_account_id, "AC123");
}

#[test]
fn patch_on_missing_client_returns_false() {
    let (_dir, store) = temp_store();
    let patch = ClientPatch {
        name: Some("ghost".to_string()),
        ..ClientPatch::default()
    };
    assert!(!store.update_client(404, patch).unwrap());
}

#[test]
fn patch_colliding_with_other_client_is_duplicate_key() {
    let (_dir, store) = temp_store();
    store
        .create_client(new_client("12345", "token-a", Vec::new()))
        .unwrap();
    let second = store
        .create_client(new_client("67890", "token-b", Vec::new()))
        .unwrap();

    let patch = ClientPatch {
        internal_token: Some("token-a".to_string()),
        ..ClientPatch::default()
    };
    let err = store.update_client(second, patch).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateKey));
    assert_eq!(
        store.get_client_by_id(second).unwrap().unwrap().internal_token,
        "token-b"
    );
}

#[test]
fn delete_client_reports_existence() {
    let (_dir, store) = temp_store();
    let id = store
        .create_client(new_client("12345", "token-a", Vec::new()))
        .unwrap();

    assert!(!store.delete_client(id + 100).unwrap());
    assert!(store.delete_client(id).unwrap());
    assert!(store.get_client_by_id(id).unwrap().is_none());
    assert!(!store.delete_client(id).unwrap());
}

#[test]
fn generated_token_can_be_used_for_lookup() {
    let (_dir, store) = temp_store();
    let token = generate_internal_token();
    let id = store
        .create_client(new_client("12345", &token, Vec::new()))
        .unwrap();

    assert_eq!(store.get_client_by_token(&token).unwrap().unwrap().id, id);
}

fn temp_store() -> (TempDir, DataStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = DataStore::open_path(db_path(dir.path())).unwrap();
    (dir, store)
}

fn db_path(dir: &Path) -> std::path::PathBuf {
    dir.join("clinic.sqlite")
}

fn raw_conn(dir: &TempDir) -> Connection {
    Connection::open(db_path(dir.path())).unwrap()
}

fn client_row(dir: &TempDir, id: i64) -> Vec<Value> {
    let conn = raw_conn(dir);
    conn.query_row("SELECT * FROM clients WHERE id = ?1;", [id], |row| {
        (0..9usize).map(|index| row.get::<_, Value>(index)).collect()
    })
    .unwrap()
}

fn sample_templates() -> Vec<MessageTemplate> {
    vec![
        MessageTemplate::named("lembrete_consulta")
            .with_attribute("content_sid", "HX1234")
            .with_attribute("language", "pt_BR"),
        MessageTemplate::named("confirmacao_consulta").with_attribute("content_sid", "HX5678"),
    ]
}

fn new_client(business_id: &str, token: &str, templates: Vec<MessageTemplate>) -> NewClient {
    NewClient {
        name: "Clínica Central".to_string(),
        business_id: business_id.to_string(),
        internal_token: token.to_string(),
        provider_account_id: "AC123".to_string(),
        provider_auth_secret: "secret".to_string(),
        provider_sender_address: "whatsapp:+14155238886".to_string(),
        templates: templates.into(),
    }
}
