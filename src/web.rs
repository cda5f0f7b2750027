use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::cookie::Key;
use actix_web::error::ErrorInternalServerError;
use actix_web::http::StatusCode as HttpStatus;
use actix_web::{middleware, web, App, HttpResponse, HttpServer, ResponseError, Result};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::config::Settings;
use crate::display::room_card_text;
use crate::error::FormError;
use crate::form::editor::ModalState;
use crate::form::{CapturedClipboard, ExtraField, ExtraItem, ShiftForm, COPIED_FLAG_DURATION};
use crate::rooms::{status_options, StatusCode, OCCUPANCY_BOUNDS, ROOMS};

const SESSION_KEY: &str = "sid";
const FORM_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

struct SessionForm {
    form: ShiftForm,
    last_touched: Instant,
}

// One form per browser session, kept in memory only
pub struct AppState {
    forms: Mutex<HashMap<String, SessionForm>>,
    idle_timeout: Duration,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default().form_idle_timeout)
    }
}

impl AppState {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            forms: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// Drops every form untouched for longer than the idle timeout
    pub fn evict_idle(&self) -> usize {
        match self.forms.lock() {
            Ok(mut forms) => evict_idle_forms(&mut forms, Instant::now(), self.idle_timeout),
            Err(_) => {
                tracing::warn!("Form store unavailable, idle forms kept");
                0
            }
        }
    }
}

fn evict_idle_forms(forms: &mut HashMap<String, SessionForm>, now: Instant, idle_timeout: Duration) -> usize {
    let before = forms.len();
    forms.retain(|_, entry| now.duration_since(entry.last_touched) < idle_timeout);
    let evicted = before - forms.len();
    if evicted > 0 {
        tracing::info!(evicted, remaining = forms.len(), "Dropped idle forms");
    }
    evicted
}

#[derive(Serialize)]
pub struct RoomCard {
    room: &'static str,
    text: String,
    filled: bool,
}

#[derive(Serialize)]
pub struct ModalView {
    room: String,
    status: Option<StatusCode>,
    occupancy: String,
    needs_occupancy: bool,
}

/// What the page renders
#[derive(Serialize)]
pub struct FormView {
    date: String,
    attendant: String,
    rooms: Vec<RoomCard>,
    extras: Vec<ExtraItem>,
    modal: Option<ModalView>,
    output: Option<String>,
    copied: bool,
}

impl From<&ShiftForm> for FormView {
    fn from(form: &ShiftForm) -> Self {
        let rooms = ROOMS
            .iter()
            .map(|&room| RoomCard {
                room,
                text: room_card_text(&form.rooms, room),
                filled: form.rooms.is_filled(room),
            })
            .collect();

        let modal = form.editor.room.as_ref().map(|room| ModalView {
            room: room.clone(),
            status: form.editor.staged_status,
            occupancy: form.editor.staged_occupancy.clone(),
            needs_occupancy: form.editor.staged_status.is_some_and(|s| s.needs_occupancy()),
        });

        Self {
            date: form.date.clone(),
            attendant: form.attendant.clone(),
            rooms,
            extras: form.extras.clone(),
            modal,
            output: form.output.clone(),
            copied: form.copied,
        }
    }
}

#[derive(Deserialize)]
pub struct DetailsRequest {
    date: Option<String>,
    attendant: Option<String>,
}

#[derive(Deserialize)]
pub struct StatusRequest {
    status: String,
}

#[derive(Deserialize)]
pub struct OccupancyRequest {
    value: String,
}

#[derive(Deserialize)]
pub struct SaveRequest {
    occupancy: Option<String>,
}

#[derive(Deserialize)]
pub struct ExtraUpdateRequest {
    field: ExtraField,
    value: String,
}

impl ResponseError for FormError {
    fn status_code(&self) -> HttpStatus {
        match self {
            FormError::UnknownRoom(_) => HttpStatus::NOT_FOUND,
            _ => HttpStatus::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({"success": false, "error": self.to_string()}))
    }
}

/// Returns the caller's session id, starting a new session when there is none
fn session_id(session: &Session) -> Result<String> {
    if let Some(sid) = session.get::<String>(SESSION_KEY)? {
        return Ok(sid);
    }

    let sid: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect();
    session.insert(SESSION_KEY, &sid)?;
    tracing::info!("New form session started");
    Ok(sid)
}

/// Runs `f` on the session's form, creating it on first use.
/// A new form first clears out idle ones.
fn with_form<T>(state: &AppState, sid: &str, f: impl FnOnce(&mut ShiftForm) -> T) -> Result<T> {
    let mut forms = state
        .forms
        .lock()
        .map_err(|_| ErrorInternalServerError("Form store unavailable"))?;
    let now = Instant::now();
    if !forms.contains_key(sid) {
        evict_idle_forms(&mut forms, now, state.idle_timeout);
    }
    let entry = forms.entry(sid.to_string()).or_insert_with(|| SessionForm {
        form: ShiftForm::for_today(),
        last_touched: now,
    });
    entry.last_touched = now;
    Ok(f(&mut entry.form))
}

/// Runs `f` only if the caller already has a form; never creates one
fn with_existing_form<T>(
    state: &AppState,
    session: &Session,
    f: impl FnOnce(&mut ShiftForm) -> T,
) -> Result<Option<T>> {
    let Some(sid) = session.get::<String>(SESSION_KEY)? else {
        return Ok(None);
    };
    let mut forms = state
        .forms
        .lock()
        .map_err(|_| ErrorInternalServerError("Form store unavailable"))?;
    Ok(forms.get_mut(&sid).map(|entry| {
        entry.last_touched = Instant::now();
        f(&mut entry.form)
    }))
}

/// Applies `change` to the caller's form and answers with the updated view
fn update_form(
    state: &AppState,
    session: &Session,
    change: impl FnOnce(&mut ShiftForm) -> Result<(), FormError>,
) -> Result<HttpResponse> {
    let sid = session_id(session)?;
    let view = with_form(state, &sid, |form| {
        change(form)?;
        Ok::<_, FormError>(FormView::from(&*form))
    })??;
    Ok(HttpResponse::Ok().json(view))
}

async fn get_options() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "rooms": ROOMS,
        "statuses": status_options(),
        "occupancy": {"min": OCCUPANCY_BOUNDS.start(), "max": OCCUPANCY_BOUNDS.end()},
    })))
}

// Reading never starts a session, so cookieless clients leave nothing behind
async fn get_form(session: Session, state: web::Data<AppState>) -> Result<HttpResponse> {
    let view = with_existing_form(&state, &session, |form| FormView::from(&*form))?
        .unwrap_or_else(|| FormView::from(&ShiftForm::for_today()));
    Ok(HttpResponse::Ok().json(view))
}

async fn update_details(
    req: web::Json<DetailsRequest>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let DetailsRequest { date, attendant } = req.into_inner();
    update_form(&state, &session, |form| {
        if let Some(date) = date {
            form.set_date(date);
        }
        if let Some(attendant) = attendant {
            form.set_attendant(attendant);
        }
        Ok(())
    })
}

async fn open_room(room: web::Path<String>, session: Session, state: web::Data<AppState>) -> Result<HttpResponse> {
    let room = room.into_inner();
    update_form(&state, &session, |form| form.open_editor(&room))
}

async fn select_status(
    req: web::Json<StatusRequest>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let status: StatusCode = req.status.parse()?;
    update_form(&state, &session, |form| form.select_status(status))
}

async fn set_occupancy(
    req: web::Json<OccupancyRequest>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let value = req.into_inner().value;
    update_form(&state, &session, |form| form.set_occupancy(value))
}

/// The page sends the occupancy field along, so the save never depends on
/// an earlier occupancy update having landed
async fn save_room(
    req: Option<web::Json<SaveRequest>>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let occupancy = req.and_then(|r| r.into_inner().occupancy);
    let sid = session_id(&session)?;
    let (saved, view) = with_form(&state, &sid, |form| {
        if let Some(text) = occupancy {
            if form.editor.modal_state() == ModalState::Editing {
                form.editor.staged_occupancy = text;
            }
        }
        let saved = form.save_room();
        (saved, FormView::from(&*form))
    })?;
    Ok(HttpResponse::Ok().json(serde_json::json!({"saved": saved, "form": view})))
}

async fn cancel_editor(session: Session, state: web::Data<AppState>) -> Result<HttpResponse> {
    update_form(&state, &session, |form| {
        form.cancel_editor();
        Ok(())
    })
}

async fn add_extra(session: Session, state: web::Data<AppState>) -> Result<HttpResponse> {
    update_form(&state, &session, |form| {
        form.add_extra();
        Ok(())
    })
}

async fn update_extra(
    index: web::Path<usize>,
    req: web::Json<ExtraUpdateRequest>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let index = index.into_inner();
    let ExtraUpdateRequest { field, value } = req.into_inner();
    update_form(&state, &session, |form| form.update_extra(index, field, value))
}

async fn generate_report(session: Session, state: web::Data<AppState>) -> Result<HttpResponse> {
    update_form(&state, &session, |form| {
        form.generate_report();
        Ok(())
    })
}

async fn copy_report(session: Session, state: web::Data<AppState>) -> Result<HttpResponse> {
    let Some(sid) = session.get::<String>(SESSION_KEY)? else {
        return Err(FormError::NoReport.into());
    };
    let mut clipboard = CapturedClipboard::default();
    with_existing_form(&state, &session, |form| form.copy_to_clipboard(&mut clipboard))?
        .unwrap_or(Err(FormError::NoReport))?;

    // The flag drops on its own; a later copy does not extend an earlier timer
    let state = state.clone();
    actix_web::rt::spawn(async move {
        tokio::time::sleep(COPIED_FLAG_DURATION).await;
        match state.forms.lock() {
            Ok(mut forms) => {
                if let Some(entry) = forms.get_mut(&sid) {
                    entry.form.clear_copied();
                }
            }
            Err(_) => tracing::warn!("Form store unavailable, copied flag left set"),
        }
    });

    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "text": clipboard.text})))
}

async fn share_report(session: Session, state: web::Data<AppState>) -> Result<HttpResponse> {
    let url = with_existing_form(&state, &session, |form| form.share_url())?
        .unwrap_or(Err(FormError::NoReport))?;
    Ok(HttpResponse::Ok().json(serde_json::json!({"url": url})))
}

async fn index() -> Result<HttpResponse> {
    let html = include_str!("../templates/index.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

/// Page and API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/api/options", web::get().to(get_options))
        .route("/api/form", web::get().to(get_form))
        .route("/api/details", web::post().to(update_details))
        .route("/api/rooms/{room}/open", web::post().to(open_room))
        .route("/api/editor/status", web::post().to(select_status))
        .route("/api/editor/occupancy", web::post().to(set_occupancy))
        .route("/api/editor/save", web::post().to(save_room))
        .route("/api/editor/cancel", web::post().to(cancel_editor))
        .route("/api/extras", web::post().to(add_extra))
        .route("/api/extras/{index}", web::post().to(update_extra))
        .route("/api/report", web::post().to(generate_report))
        .route("/api/report/copy", web::post().to(copy_report))
        .route("/api/report/share", web::get().to(share_report));
}

/// Cookie carrying only the session id. Plain HTTP, so not marked secure.
pub fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(false)
        .build()
}

pub async fn start_server(settings: Settings) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::new(settings.form_idle_timeout));
    let key = Key::generate();

    let sweeper = app_state.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(FORM_SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            sweeper.evict_idle();
        }
    });
    let static_dir = settings.static_dir.clone();

    tracing::info!(bind = %settings.bind_host, port = settings.port, "Starting web server");

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(session_middleware(key.clone()))
            .wrap(middleware::Logger::default())
            .service(Files::new("/static", static_dir.clone()))
            .configure(configure)
    })
    .bind((settings.bind_host.as_str(), settings.port))?
    .run()
    .await
}
