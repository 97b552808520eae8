// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end tests of the client state against a live server.
//!
//! Each test serves a fresh app on an ephemeral port and drives it through
//! the forms, session store and list views the CLI uses.

use cleanstreet::client::{ApiClient, Attachment};
use cleanstreet::forms::register::Field;
use cleanstreet::forms::{FeedbackForm, IssueForm, LoginForm, RegisterForm, NETWORK_ERROR, SUBMIT};
use cleanstreet::guard::{
    navigate, Navigation, View, ADMIN_DASHBOARD_PATH, LOGIN_PATH, UNAUTHORIZED_PATH,
    USER_DASHBOARD_PATH,
};
use cleanstreet::models::{Role, Status};
use cleanstreet::session::{SessionState, SessionStore};
use cleanstreet::views::{AdminComplaintList, FeedbackList, ListState, UserComplaintList};

mod common;

/// Log in through the form and return a client carrying the new token.
async fn sign_in(api: &str, session: &mut SessionStore, email: &str) -> (ApiClient, &'static str) {
    let client = ApiClient::new(api).unwrap();
    let mut form = LoginForm::new();
    form.set_email(email);
    form.set_password(common::PASSWORD);
    let landing = form.submit(&client, session).await.expect("login succeeds");
    let token = session.token().map(str::to_string);
    (client.with_token(token), landing)
}

fn report_form(user: Option<&cleanstreet::session::SessionUser>) -> IssueForm {
    let mut form = IssueForm::new_report(user);
    form.set_category("infrastructure");
    form.set_title("Broken footpath slab");
    form.set_description("A loose slab near the school gate keeps tripping children.");
    form.set_location_address("Malleshwaram");
    form.set_severity(4);
    form
}

#[tokio::test]
async fn test_register_and_login() {
    let (api, _state) = common::spawn_server().await;
    let client = ApiClient::new(&api).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let session_path = dir.path().join("session.json");

    let mut form = RegisterForm::new();
    form.set(Field::FirstName, "Asha");
    form.set(Field::LastName, "Rao");
    form.set(Field::Email, "asha@example.com");
    form.set(Field::Password, "Str0ng!pass");
    form.set(Field::ConfirmPassword, "Str0ng!pass");
    assert!(form.next());
    form.set(Field::Address, "12 Temple Road");
    form.set(Field::City, "Bengaluru");
    form.set(Field::ZipCode, "560003");
    form.set(Field::Neighborhood, "Malleshwaram");
    assert!(form.next());
    form.set_agree_to_terms(true);
    assert_eq!(form.submit(&client).await, Some(LOGIN_PATH));

    // Same email again shows the server's reason
    assert_eq!(form.submit(&client).await, None);
    assert!(form
        .errors()
        .get(SUBMIT)
        .unwrap()
        .contains("already exists"));

    let mut session = SessionStore::open(&session_path);
    assert_eq!(session.state(), SessionState::Anonymous);

    let mut login = LoginForm::new();
    login.set_email("asha@example.com");
    login.set_password("wrong-password");
    assert_eq!(login.submit(&client, &mut session).await, None);
    assert_eq!(login.errors().get(SUBMIT), Some("Invalid email or password."));

    login.set_password("Str0ng!pass");
    assert_eq!(
        login.submit(&client, &mut session).await,
        Some(USER_DASHBOARD_PATH)
    );

    // The session survives a restart
    let reopened = SessionStore::open(&session_path);
    assert_eq!(
        reopened.state(),
        SessionState::Authenticated {
            role: "USER".to_string()
        }
    );
    assert_eq!(reopened.user().unwrap().name, "Asha Rao");
    assert!(reopened.token().is_some());
    assert_eq!(
        navigate(&reopened.state(), ADMIN_DASHBOARD_PATH),
        Navigation::Redirect(UNAUTHORIZED_PATH)
    );
    assert_eq!(
        navigate(&reopened.state(), USER_DASHBOARD_PATH),
        Navigation::Show(View::UserDashboard)
    );
}

#[tokio::test]
async fn test_report_edit_and_list() {
    let (api, state) = common::spawn_server().await;
    common::seed_user(&state, "Asha Rao", "asha@example.com", Role::User);
    let dir = tempfile::tempdir().unwrap();
    let mut session = SessionStore::open(dir.path().join("session.json"));

    let (client, landing) = sign_in(&api, &mut session, "asha@example.com").await;
    assert_eq!(landing, USER_DASHBOARD_PATH);
    let user = session.user().cloned();
    let user_id = user.as_ref().unwrap().id;

    let mut form = report_form(user.as_ref());
    let rejected = form.add_media(vec![
        Attachment {
            file_name: "slab.png".to_string(),
            mime: "image/png".to_string(),
            bytes: b"png-bytes".to_vec(),
        },
        Attachment {
            file_name: "notes.txt".to_string(),
            mime: "text/plain".to_string(),
            bytes: b"text".to_vec(),
        },
    ]);
    assert_eq!(rejected, vec!["File type text/plain is not supported".to_string()]);
    assert!(form.preview());

    let created = form
        .submit(&client, user.as_ref())
        .await
        .expect("report accepted");
    assert_eq!(created.status, Status::Open);
    assert_eq!(created.severity, Some(4));
    assert_eq!(created.category.as_deref(), Some("infrastructure"));
    assert!(created.image_url.as_deref().unwrap().ends_with("_slab.png"));
    // A successful submit clears the form
    assert!(form.media().is_empty());
    assert!(!form.is_previewing());

    let mut list = UserComplaintList::new(user_id);
    list.load(&client).await;
    assert_eq!(list.state().items().len(), 1);

    let mut edit = list.edit(created.id).expect("complaint listed");
    edit.set_title("Broken footpath slab (two slabs now)");
    let updated = edit.submit(&client, user.as_ref()).await.expect("edit accepted");
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "Broken footpath slab (two slabs now)");
    assert_eq!(updated.image_url, created.image_url);

    // Once triaged, the owner can no longer edit
    state
        .db
        .update_complaint(created.id, |c| c.status = Status::InProgress);
    let mut late = IssueForm::edit(&updated);
    late.set_title("Too late");
    assert!(late.submit(&client, user.as_ref()).await.is_none());
    assert!(late
        .errors()
        .get(SUBMIT)
        .unwrap()
        .starts_with("Failed to update report:"));
}

#[tokio::test]
async fn test_admin_triage() {
    let (api, state) = common::spawn_server().await;
    common::seed_user(&state, "Asha Rao", "asha@example.com", Role::User);
    common::seed_user(&state, "Admin", "admin@example.com", Role::Admin);
    let dir = tempfile::tempdir().unwrap();

    let mut citizen_session = SessionStore::open(dir.path().join("citizen.json"));
    let (citizen, _) = sign_in(&api, &mut citizen_session, "asha@example.com").await;
    let citizen_user = citizen_session.user().cloned();
    let created = report_form(citizen_user.as_ref())
        .submit(&citizen, citizen_user.as_ref())
        .await
        .expect("report accepted");

    let mut admin_session = SessionStore::open(dir.path().join("admin.json"));
    let (admin, landing) = sign_in(&api, &mut admin_session, "admin@example.com").await;
    assert_eq!(landing, ADMIN_DASHBOARD_PATH);
    assert!(admin_session.is_admin());

    let mut list = AdminComplaintList::new();
    list.load(&admin).await;
    assert_eq!(list.visible().len(), 1);
    list.set_search("malle");
    assert_eq!(list.visible().len(), 1);
    list.set_search("");

    // Delete refused while the complaint is still open
    let mut prompt = common::ScriptedPrompt::accepting();
    assert!(!list.delete(&admin, &mut prompt, created.id).await);
    assert_eq!(
        prompt.last_alert(),
        Some("Complaints can only be deleted if their status is RESOLVED.")
    );

    assert!(
        list.change_status(&admin, &mut prompt, created.id, Status::Resolved)
            .await
    );
    assert_eq!(
        prompt.last_alert(),
        Some(format!("Complaint {} status updated to RESOLVED", created.id).as_str())
    );
    assert_eq!(list.state().items()[0].status, Status::Resolved);

    // Declining the confirmation leaves everything alone
    let mut decline = common::ScriptedPrompt::default();
    assert!(!list.delete(&admin, &mut decline, created.id).await);
    assert!(decline.alerts.is_empty());
    assert_eq!(list.state().items().len(), 1);

    assert!(list.delete(&admin, &mut prompt, created.id).await);
    assert_eq!(
        prompt.last_alert(),
        Some("Complaint deleted successfully by Admin!")
    );
    assert_eq!(*list.state(), ListState::Empty);
    assert_eq!(
        list.empty_message(),
        Some("No complaints found in the system.")
    );

    // The citizen cannot load the admin list
    let mut forbidden = AdminComplaintList::new();
    forbidden.load(&citizen).await;
    assert_eq!(
        *forbidden.state(),
        ListState::Error("HTTP error! status: 403".to_string())
    );
}

#[tokio::test]
async fn test_user_delete_alerts_on_conflict() {
    let (api, state) = common::spawn_server().await;
    common::seed_user(&state, "Asha Rao", "asha@example.com", Role::User);
    let dir = tempfile::tempdir().unwrap();
    let mut session = SessionStore::open(dir.path().join("session.json"));
    let (client, _) = sign_in(&api, &mut session, "asha@example.com").await;
    let user = session.user().cloned();

    let created = report_form(user.as_ref())
        .submit(&client, user.as_ref())
        .await
        .unwrap();

    let mut list = UserComplaintList::new(user.as_ref().unwrap().id);
    list.load(&client).await;

    let mut prompt = common::ScriptedPrompt::accepting();
    assert!(!list.delete(&client, &mut prompt, created.id).await);
    assert!(prompt
        .last_alert()
        .unwrap()
        .starts_with("Failed to delete complaint:"));
    assert_eq!(list.state().items().len(), 1);

    state
        .db
        .update_complaint(created.id, |c| c.status = Status::Resolved);
    assert!(list.delete(&client, &mut prompt, created.id).await);
    assert_eq!(prompt.last_alert(), Some("Complaint deleted successfully!"));
    assert_eq!(
        list.empty_message(),
        Some("You have not reported any complaints yet.")
    );
}

#[tokio::test]
async fn test_feedback_round_trip() {
    let (api, state) = common::spawn_server().await;
    common::seed_user(&state, "Admin", "admin@example.com", Role::Admin);
    let anonymous = ApiClient::new(&api).unwrap();

    let mut form = FeedbackForm::new();
    form.set_subject("Great service");
    form.set_message("The streetlight was fixed two days after I reported it.");
    form.set_allow_contact(true);
    form.set_contact_name("Pat");
    form.set_contact_email("pat@example.com");
    let sent = form.submit(&anonymous).await.expect("feedback accepted");
    assert!(form.is_submitted());
    assert_eq!(sent.contact_name.as_deref(), Some("Pat"));

    // Reading it back needs an administrator
    let mut inbox = FeedbackList::new();
    inbox.load(&anonymous).await;
    assert_eq!(
        *inbox.state(),
        ListState::Error("Failed to fetch feedbacks".to_string())
    );

    let dir = tempfile::tempdir().unwrap();
    let mut session = SessionStore::open(dir.path().join("session.json"));
    let (admin, _) = sign_in(&api, &mut session, "admin@example.com").await;
    inbox.load(&admin).await;
    assert_eq!(inbox.state().items().len(), 1);
    assert_eq!(inbox.state().items()[0].subject, "Great service");
    assert_eq!(inbox.empty_message(), None);
}

#[tokio::test]
async fn test_server_unreachable() {
    // Bind then drop to get a port nothing is listening on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(&format!("http://{}/api", addr)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut session = SessionStore::open(dir.path().join("session.json"));

    let mut login = LoginForm::new();
    login.set_email("asha@example.com");
    login.set_password("whatever");
    assert_eq!(login.submit(&client, &mut session).await, None);
    assert_eq!(login.errors().get(SUBMIT), Some(NETWORK_ERROR));
    assert_eq!(session.state(), SessionState::Anonymous);

    let mut form = report_form(None);
    form.set_anonymous(true);
    assert!(form.submit(&client, None).await.is_none());
    assert_eq!(form.errors().get(SUBMIT), Some(NETWORK_ERROR));
}

#[tokio::test]
async fn test_truncated_response_is_not_a_network_error() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    // Accepts one request and promises more body than it sends.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        let _ = socket
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n{\"id\":")
            .await;
        let _ = socket.shutdown().await;
    });

    let client = ApiClient::new(&format!("http://{}/api", addr)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut session = SessionStore::open(dir.path().join("session.json"));

    let mut login = LoginForm::new();
    login.set_email("asha@example.com");
    login.set_password("whatever");
    assert_eq!(login.submit(&client, &mut session).await, None);
    assert_eq!(
        login.errors().get(SUBMIT),
        Some("Login failed. Please try again later.")
    );
    assert_eq!(session.state(), SessionState::Anonymous);
}
