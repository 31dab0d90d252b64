//! Application controller
//!
//! Owns the current route and view, runs requests on spawned tasks and
//! applies their outcomes in arrival order. Session events (401 expiry,
//! logout) are drained before any outcome is applied, so an expired session
//! always lands on the login screen first.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use desk_client::{ClientError, DeskClient, SessionContext, SessionEvent};
use ratatui::Terminal;
use ratatui::backend::Backend;
use shared::models::{Ticket, User};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::{broadcast, mpsc};

use crate::route::Route;
use crate::ui;
use crate::views::{
    Action, ComposeKind, DetailData, LoginView, Mutation, Request, TicketQuery, View,
    customer, detail, ticket_list,
};

pub const SESSION_EXPIRED: &str = "Session expired. Please log in again.";
const LOGIN_FAILED: &str = "Login failed. Please try again.";
const REGISTER_FAILED: &str = "Registration failed. Please try again.";

/// Result of one request, already reduced to display strings
#[derive(Debug)]
pub enum Outcome {
    LoggedIn(Result<User, String>),
    Registered(Result<User, String>),
    TicketsLoaded {
        query: TicketQuery,
        result: Result<Vec<Ticket>, String>,
    },
    TicketCreated(Result<Ticket, String>),
    DetailLoaded(Result<DetailData, String>),
    Mutated {
        mutation: Mutation,
        result: Result<(), String>,
    },
    MessagePosted(Result<(), String>),
}

/// An outcome tagged with the route that issued it
#[derive(Debug)]
struct Envelope {
    route: Route,
    outcome: Outcome,
}

pub struct App {
    client: DeskClient,
    session: SessionContext,
    route: Route,
    view: View,
    events: broadcast::Receiver<SessionEvent>,
    outcome_tx: mpsc::UnboundedSender<Envelope>,
    outcome_rx: mpsc::UnboundedReceiver<Envelope>,
    pending: usize,
    should_quit: bool,
}

impl App {
    /// Build the controller and open `start` (or the default screen).
    ///
    /// Must be called inside a tokio runtime; the first screen's load is
    /// spawned immediately.
    pub fn new(client: DeskClient, start: Option<&str>) -> Self {
        let session = client.session().clone();
        let events = session.subscribe();
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();

        let user = session.user();
        let route = match (start, &user) {
            (Some(path), _) => Route::resolve(path, user.as_ref()),
            (None, Some(user)) => Route::home_for(user.role),
            (None, None) => Route::Login,
        };

        let mut app = Self {
            client,
            session,
            route: Route::Login,
            view: View::Login(LoginView::new()),
            events,
            outcome_tx,
            outcome_rx,
            pending: 0,
            should_quit: false,
        };
        app.navigate(route);
        app
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Switch screens through the auth guard.
    pub fn navigate(&mut self, route: Route) {
        let user = self.session.user();
        let route = route.guard(user.as_ref());
        tracing::debug!(from = %self.route, to = %route, "Navigate");

        let (view, action) = View::for_route(route, user.as_ref());
        self.route = route;
        self.view = view;
        if let Some(action) = action {
            self.dispatch(action);
        }
    }

    pub fn navigate_path(&mut self, path: &str) {
        let route = Route::resolve(path, self.session.user().as_ref());
        self.navigate(route);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('l') if self.session.is_authenticated() => {
                    self.dispatch(Action::Logout);
                    return;
                }
                _ => {}
            }
        }
        if let Some(action) = self.view.handle_key(key) {
            self.dispatch(action);
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Navigate(route) => self.navigate(route),
            Action::Logout => {
                self.client.logout();
                self.drain_session_events();
                self.navigate(Route::Login);
            }
            Action::Quit => self.should_quit = true,
            Action::Request(request) => self.spawn(request),
        }
    }

    fn spawn(&mut self, request: Request) {
        let client = self.client.clone();
        let tx = self.outcome_tx.clone();
        let route = self.route;
        self.pending += 1;

        tokio::spawn(async move {
            let outcome = perform(&client, request).await;
            // Receiver lives as long as the app
            let _ = tx.send(Envelope { route, outcome });
        });
    }

    fn apply(&mut self, envelope: Envelope) {
        self.pending = self.pending.saturating_sub(1);
        self.drain_session_events();

        if envelope.route != self.route {
            tracing::debug!(issued = %envelope.route, current = %self.route, "Dropping stale outcome");
            return;
        }

        let follow_up = match (envelope.outcome, &mut self.view) {
            (Outcome::LoggedIn(Ok(user)) | Outcome::Registered(Ok(user)), _) => {
                Some(Action::Navigate(Route::home_for(user.role)))
            }
            (Outcome::LoggedIn(Err(message)), View::Login(view)) => {
                view.complete(Err(message));
                None
            }
            (Outcome::Registered(Err(message)), View::Register(view)) => {
                view.complete(Err(message));
                None
            }
            (Outcome::TicketsLoaded { query, result }, View::Customer(view)) => {
                view.complete_load(query, result);
                None
            }
            (Outcome::TicketsLoaded { query, result }, View::Agent(view)) => {
                view.complete_load(query, result);
                None
            }
            (Outcome::TicketCreated(result), View::Customer(view)) => view.complete_create(result),
            (Outcome::DetailLoaded(result), View::Detail(view)) => {
                view.complete_load(result);
                None
            }
            (Outcome::Mutated { mutation, result }, View::Detail(view)) => {
                view.complete_mutation(mutation, result)
            }
            (Outcome::MessagePosted(result), View::Detail(view)) => view.complete_post(result),
            (outcome, _) => {
                tracing::debug!(?outcome, "Outcome does not match current view");
                None
            }
        };

        if let Some(action) = follow_up {
            self.dispatch(action);
        }
    }

    fn on_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Expired => {
                tracing::warn!(route = %self.route, "Session expired, returning to login");
                self.route = Route::Login;
                self.view = View::Login(LoginView::with_notice(SESSION_EXPIRED));
            }
            SessionEvent::LoggedOut => {
                if self.route.requires_auth() {
                    self.navigate(Route::Login);
                }
            }
            SessionEvent::LoggedIn(_) => {}
        }
    }

    fn drain_session_events(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(event) => self.on_session_event(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Session events lagged");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }

    /// Apply outcomes until no request is outstanding, including follow-ups.
    pub async fn settle(&mut self) {
        while self.pending > 0 {
            match self.outcome_rx.recv().await {
                Some(envelope) => self.apply(envelope),
                None => break,
            }
        }
        self.drain_session_events();
    }

    /// Draw and react until the user quits.
    pub async fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let (key_tx, mut key_rx) = mpsc::unbounded_channel();
        std::thread::spawn(move || {
            loop {
                match event::read() {
                    Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                        if key_tx.send(key).is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::error!("Terminal input failed: {}", e);
                        break;
                    }
                }
            }
        });

        loop {
            terminal.draw(|frame| ui::render(frame, &self))?;
            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(key) = key_rx.recv() => self.handle_key(key),
                Some(envelope) = self.outcome_rx.recv() => self.apply(envelope),
                event = self.events.recv() => match event {
                    Ok(event) => self.on_session_event(event),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Session events lagged");
                    }
                    Err(RecvError::Closed) => {}
                },
                else => break,
            }
        }

        tracing::info!("Exiting");
        Ok(())
    }
}

async fn perform(client: &DeskClient, request: Request) -> Outcome {
    fn reduce<T>(result: Result<T, ClientError>, fallback: &str) -> Result<T, String> {
        result.map_err(|e| {
            tracing::warn!("Request failed: {}", e);
            e.user_message(fallback)
        })
    }

    match request {
        Request::Login { email, password } => {
            Outcome::LoggedIn(reduce(client.login(&email, &password).await, LOGIN_FAILED))
        }
        Request::Register {
            email,
            password,
            first_name,
            last_name,
            role,
        } => Outcome::Registered(reduce(
            client
                .register(&email, &password, &first_name, &last_name, role)
                .await,
            REGISTER_FAILED,
        )),
        Request::LoadTickets(query) => {
            let result = match query {
                TicketQuery::Customer(id) => client.tickets_by_customer(id).await,
                TicketQuery::Agent(id) => client.tickets_by_agent(id).await,
                TicketQuery::Unassigned => client.unassigned_tickets().await,
                TicketQuery::All => client.all_tickets().await,
            };
            Outcome::TicketsLoaded {
                query,
                result: reduce(result, ticket_list::LOAD_FAILED),
            }
        }
        Request::CreateTicket {
            customer_id,
            title,
            description,
            priority,
        } => Outcome::TicketCreated(reduce(
            client
                .create_ticket(customer_id, &title, &description, priority)
                .await,
            customer::CREATE_FAILED,
        )),
        Request::LoadDetail(id) => {
            Outcome::DetailLoaded(reduce(load_detail(client, id).await, detail::LOAD_FAILED))
        }
        Request::Mutate {
            ticket_id,
            mutation,
        } => {
            let result = match mutation {
                Mutation::Status(status) => client.update_status(ticket_id, status).await,
                Mutation::Priority(priority) => client.update_priority(ticket_id, priority).await,
                Mutation::Assign(agent_id) => client.assign_ticket(ticket_id, agent_id).await,
                Mutation::Unassign => client.unassign_ticket(ticket_id).await,
            };
            Outcome::Mutated {
                mutation,
                result: reduce(result.map(|_| ()), mutation.failure_message()),
            }
        }
        Request::PostMessage {
            ticket_id,
            sender_id,
            content,
            note,
        } => {
            let result = if note {
                client.add_note(ticket_id, sender_id, &content).await
            } else {
                client.add_reply(ticket_id, sender_id, &content).await
            };
            Outcome::MessagePosted(reduce(
                result.map(|_| ()),
                ComposeKind::from_note(note).failure_message(),
            ))
        }
    }
}

async fn load_detail(client: &DeskClient, id: i64) -> Result<DetailData, ClientError> {
    let (ticket, messages) = tokio::try_join!(client.get_ticket(id), client.ticket_messages(id))?;

    let can_assign = client
        .session()
        .user()
        .is_some_and(|u| u.role.can_manage_tickets());
    let agents = if can_assign {
        match client.agents().await {
            Ok(agents) => agents,
            Err(e) if e.is_unauthorized() => return Err(e),
            Err(e) => {
                tracing::warn!("Failed to load agents: {}", e);
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    Ok(DetailData {
        ticket,
        messages,
        agents,
    })
}
