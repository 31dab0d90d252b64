//! End-to-end client flows against the in-memory backend

use desk_client::{
    ClientConfig, ClientError, DeskClient, FileSessionStore, SessionContext, SessionEvent,
    SessionStore, TicketPriority, TicketStatus, UserRole, visible_messages,
};
use desk_mock::{MockBackend, demo};

fn client_for(backend: &MockBackend, session: SessionContext) -> DeskClient {
    DeskClient::connect(&ClientConfig::new(backend.base_url()), session).unwrap()
}

async fn logged_in(backend: &MockBackend, email: &str, password: &str) -> DeskClient {
    let client = client_for(backend, SessionContext::in_memory());
    client.login(email, password).await.unwrap();
    client
}

#[tokio::test]
async fn test_login_populates_session() {
    let backend = MockBackend::spawn().await.unwrap();
    let session = SessionContext::in_memory();
    let mut events = session.subscribe();
    let client = client_for(&backend, session.clone());

    let user = client
        .login(demo::CUSTOMER_EMAIL, demo::CUSTOMER_PASSWORD)
        .await
        .unwrap();

    assert_eq!(user.role, UserRole::Customer);
    assert_eq!(session.user().map(|u| u.id), Some(user.id));
    assert!(session.token().is_some_and(|t| !t.is_empty()));
    assert_eq!(events.recv().await.unwrap(), SessionEvent::LoggedIn(user.clone()));

    // Token is attached: a protected endpoint answers
    let tickets = client.tickets_by_customer(user.id).await.unwrap();
    assert!(tickets.is_empty());
}

#[tokio::test]
async fn test_failed_login_keeps_server_message() {
    let backend = MockBackend::spawn().await.unwrap();
    let session = SessionContext::in_memory();
    let client = client_for(&backend, session.clone());

    let err = client
        .login(demo::CUSTOMER_EMAIL, "wrong")
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.user_message("Login failed"), "Invalid email or password");
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_wrong_password_keeps_existing_session() {
    let backend = MockBackend::spawn().await.unwrap();
    let session = SessionContext::in_memory();
    let client = client_for(&backend, session.clone());
    client
        .login(demo::AGENT_EMAIL, demo::AGENT_PASSWORD)
        .await
        .unwrap();
    let mut events = session.subscribe();

    let err = client.login(demo::AGENT_EMAIL, "typo").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(session.is_authenticated());
    assert!(events.try_recv().is_err());
    assert!(client.all_tickets().await.is_ok());
}

#[tokio::test]
async fn test_requests_without_token_are_rejected() {
    let backend = MockBackend::spawn().await.unwrap();
    let client = client_for(&backend, SessionContext::in_memory());
    let err = client.all_tickets().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized(_)));
}

#[tokio::test]
async fn test_unauthorized_clears_session_and_store() {
    let backend = MockBackend::spawn().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let session = SessionContext::new(FileSessionStore::new(&path));
    let client = client_for(&backend, session.clone());
    client
        .login(demo::AGENT_EMAIL, demo::AGENT_PASSWORD)
        .await
        .unwrap();
    assert!(path.exists());

    let mut events = session.subscribe();
    backend.revoke_sessions().unwrap();

    let err = client.all_tickets().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(!session.is_authenticated());
    assert!(FileSessionStore::new(&path).load().unwrap().is_none());
    assert_eq!(events.recv().await.unwrap(), SessionEvent::Expired);

    // A restarted client finds nothing to restore
    assert!(!SessionContext::new(FileSessionStore::new(&path)).is_authenticated());
}

#[tokio::test]
async fn test_session_survives_restart() {
    let backend = MockBackend::spawn().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let config = ClientConfig::new(backend.base_url()).with_session_file(dir.path().join("s.json"));

    let first = DeskClient::connect(&config, SessionContext::from_config(&config)).unwrap();
    let user = first
        .login(demo::CUSTOMER_EMAIL, demo::CUSTOMER_PASSWORD)
        .await
        .unwrap();

    let second = DeskClient::connect(&config, SessionContext::from_config(&config)).unwrap();
    assert_eq!(second.session().user().map(|u| u.id), Some(user.id));
    second.tickets_by_customer(user.id).await.unwrap();
}

#[tokio::test]
async fn test_created_ticket_is_open_with_requested_priority() {
    let backend = MockBackend::spawn().await.unwrap();
    let client = logged_in(&backend, demo::CUSTOMER_EMAIL, demo::CUSTOMER_PASSWORD).await;
    let me = client.session().require_user().unwrap();

    let created = client
        .create_ticket(me.id, "Printer jam", "paper stuck", TicketPriority::High)
        .await
        .unwrap();
    assert_eq!(created.customer.id, me.id);
    assert!(created.assigned_agent.is_some());

    let mine = client.tickets_by_customer(me.id).await.unwrap();
    let ticket = mine.iter().find(|t| t.id == created.id).unwrap();
    assert_eq!(ticket.title, "Printer jam");
    assert_eq!(ticket.status, TicketStatus::Open);
    assert_eq!(ticket.priority, TicketPriority::High);
}

#[tokio::test]
async fn test_notes_never_reach_customers() {
    let backend = MockBackend::spawn().await.unwrap();
    let customer = logged_in(&backend, demo::CUSTOMER_EMAIL, demo::CUSTOMER_PASSWORD).await;
    let agent = logged_in(&backend, demo::AGENT_EMAIL, demo::AGENT_PASSWORD).await;
    let customer_id = customer.session().require_user().unwrap().id;
    let agent_id = agent.session().require_user().unwrap().id;

    let ticket = customer
        .create_ticket(customer_id, "Login loop", "keeps redirecting", TicketPriority::Medium)
        .await
        .unwrap();
    customer.add_reply(ticket.id, customer_id, "Any news?").await.unwrap();
    let note = agent
        .add_note(ticket.id, agent_id, "Likely a cookie issue")
        .await
        .unwrap();

    let agent_view = agent.ticket_messages(ticket.id).await.unwrap();
    assert_eq!(agent_view.len(), 2);
    assert!(
        visible_messages(&agent_view, UserRole::Agent)
            .iter()
            .any(|m| m.id == note.id)
    );
    assert!(
        visible_messages(&agent_view, UserRole::Customer)
            .iter()
            .all(|m| m.id != note.id)
    );

    let customer_view = customer.ticket_messages(ticket.id).await.unwrap();
    assert!(customer_view.iter().all(|m| m.id != note.id));

    // Customers cannot author notes
    let err = customer
        .add_note(ticket.id, customer_id, "sneaky")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Forbidden(_)));
}

#[tokio::test]
async fn test_reload_shows_server_status() {
    let backend = MockBackend::spawn().await.unwrap();
    let customer = logged_in(&backend, demo::CUSTOMER_EMAIL, demo::CUSTOMER_PASSWORD).await;
    let agent = logged_in(&backend, demo::AGENT_EMAIL, demo::AGENT_PASSWORD).await;
    let customer_id = customer.session().require_user().unwrap().id;
    let agent_id = agent.session().require_user().unwrap().id;

    let ticket = customer
        .create_ticket(customer_id, "VPN", "drops hourly", TicketPriority::Low)
        .await
        .unwrap();

    let updated = agent
        .update_status(ticket.id, TicketStatus::Resolved)
        .await
        .unwrap();
    assert_eq!(updated.status, TicketStatus::Resolved);

    // Server-side rule moves it on behind the client's back
    backend
        .state()
        .store()
        .unwrap()
        .update_status(ticket.id, TicketStatus::Closed, agent_id)
        .unwrap();

    let reloaded = agent.get_ticket(ticket.id).await.unwrap();
    assert_eq!(reloaded.status, TicketStatus::Closed);
}

#[tokio::test]
async fn test_customers_cannot_change_status() {
    let backend = MockBackend::spawn().await.unwrap();
    let customer = logged_in(&backend, demo::CUSTOMER_EMAIL, demo::CUSTOMER_PASSWORD).await;
    let customer_id = customer.session().require_user().unwrap().id;
    let ticket = customer
        .create_ticket(customer_id, "Mouse", "double clicks", TicketPriority::Low)
        .await
        .unwrap();

    let err = customer
        .update_status(ticket.id, TicketStatus::Closed)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Forbidden(_)));
    // 403 is not an expiry
    assert!(customer.session().is_authenticated());
}

#[tokio::test]
async fn test_assignment_round_trip() {
    let backend = MockBackend::spawn().await.unwrap();
    let customer = logged_in(&backend, demo::CUSTOMER_EMAIL, demo::CUSTOMER_PASSWORD).await;
    let agent = logged_in(&backend, demo::AGENT_EMAIL, demo::AGENT_PASSWORD).await;
    let customer_id = customer.session().require_user().unwrap().id;

    let ticket = customer
        .create_ticket(customer_id, "Screen", "flickers", TicketPriority::Urgent)
        .await
        .unwrap();

    let unassigned = agent.unassign_ticket(ticket.id).await.unwrap();
    assert!(unassigned.assigned_agent.is_none());
    assert!(
        agent
            .unassigned_tickets()
            .await
            .unwrap()
            .iter()
            .any(|t| t.id == ticket.id)
    );

    let agents = agent.agents().await.unwrap();
    let sam = agents
        .iter()
        .find(|a| a.email == demo::SECOND_AGENT_EMAIL)
        .unwrap();
    let assigned = agent.assign_ticket(ticket.id, sam.id).await.unwrap();
    assert!(assigned.is_assigned_to(sam.id));
    assert!(
        agent
            .tickets_by_agent(sam.id)
            .await
            .unwrap()
            .iter()
            .any(|t| t.id == ticket.id)
    );
}

#[tokio::test]
async fn test_register_logs_in_and_profile_update() {
    let backend = MockBackend::spawn().await.unwrap();
    let client = client_for(&backend, SessionContext::in_memory());

    let user = client
        .register("new@example.com", "pw123", "New", "Person", UserRole::Customer)
        .await
        .unwrap();
    assert!(client.session().is_authenticated());

    let renamed = client.update_user(user.id, "Renamed", "Person").await.unwrap();
    assert_eq!(renamed.first_name, "Renamed");
    assert_eq!(client.get_user(user.id).await.unwrap().first_name, "Renamed");

    let err = client
        .register("new@example.com", "pw", "Dup", "Licate", UserRole::Customer)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn test_only_notes_can_be_deleted() {
    let backend = MockBackend::spawn().await.unwrap();
    let customer = logged_in(&backend, demo::CUSTOMER_EMAIL, demo::CUSTOMER_PASSWORD).await;
    let agent = logged_in(&backend, demo::AGENT_EMAIL, demo::AGENT_PASSWORD).await;
    let customer_id = customer.session().require_user().unwrap().id;
    let agent_id = agent.session().require_user().unwrap().id;
    let ticket = customer
        .create_ticket(customer_id, "Keyboard", "sticky keys", TicketPriority::Low)
        .await
        .unwrap();

    let reply = agent.add_reply(ticket.id, agent_id, "Try cleaning it").await.unwrap();
    let note = agent.add_note(ticket.id, agent_id, "coffee?").await.unwrap();

    assert!(matches!(
        agent.delete_message(reply.id).await,
        Err(ClientError::Validation(_))
    ));
    agent.delete_message(note.id).await.unwrap();
    assert!(matches!(
        agent.get_message(note.id).await,
        Err(ClientError::NotFound(_))
    ));
    assert_eq!(agent.user_messages(agent_id).await.unwrap().len(), 1);
}
