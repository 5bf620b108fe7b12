use actix_web::dev::Server;
use actix_web::{http::StatusCode, web, App, HttpResponse, HttpServer, Responder, ResponseError};
use log::info;
use serde::Serialize;
use std::net::TcpListener;

use crate::config::InvocationArgs;
use crate::error::ShoutoutError;
use crate::gql::ClipAccessSource;
use crate::host::{Host, Sleeper, ThreadRngPicker};
use crate::pipeline::ShoutoutPipeline;
use crate::presenter::PresentationRequest;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoutoutResponse {
    pub status: &'static str,
    pub display_name: String,
    pub url: String,
    pub duration_millis: u64,
}

impl From<PresentationRequest> for ShoutoutResponse {
    fn from(request: PresentationRequest) -> Self {
        ShoutoutResponse {
            status: "presented",
            display_name: request.display_name,
            url: request.final_url,
            duration_millis: request.duration_millis,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
}

impl ResponseError for ShoutoutError {
    fn status_code(&self) -> StatusCode {
        match self {
            ShoutoutError::InputParse { .. }
            | ShoutoutError::ClipNotFound { .. }
            | ShoutoutError::NoClips { .. } => StatusCode::NOT_FOUND,
            ShoutoutError::UpstreamRequest { .. }
            | ShoutoutError::ResponseShape(_)
            | ShoutoutError::Transport(_) => StatusCode::BAD_GATEWAY,
            ShoutoutError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ShoutoutError::MissingGlobal(_) | ShoutoutError::Host(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = self
            .chat_message()
            .map(str::to_string)
            .unwrap_or_else(|| self.to_string());
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            status: "error",
            message,
        })
    }
}

/// Trigger one shout-out and wait until it has finished playing
///
/// # Example
/// ```shell
/// curl -X POST http://localhost:8080/shoutout \
///   -H 'Content-Type: application/json' \
///   -d '{"targetUser": "streamerX", "clipsWithinDays": 30}'
/// ```
///
/// # Returns
/// ```json
/// {
///     "status": "presented",
///     "displayName": "streamerX",
///     "url": "https://.../clip.mp4?token=...&sig=...",
///     "durationMillis": 12500
/// }
/// ```
async fn trigger_shoutout<H, A, S>(
    pipeline: web::Data<ShoutoutPipeline<H, A, S>>,
    args: web::Json<InvocationArgs>,
) -> Result<HttpResponse, ShoutoutError>
where
    H: Host + 'static,
    A: ClipAccessSource + 'static,
    S: Sleeper + 'static,
{
    info!("Shout-out triggered: {:?}", args);
    let request = pipeline.run(&args, &mut ThreadRngPicker).await?;
    Ok(HttpResponse::Ok().json(ShoutoutResponse::from(request)))
}

async fn health() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

/// Registers the shout-out routes for a pipeline stored as app data.
pub fn routes<H, A, S>(cfg: &mut web::ServiceConfig)
where
    H: Host + 'static,
    A: ClipAccessSource + 'static,
    S: Sleeper + 'static,
{
    cfg.route("/shoutout", web::post().to(trigger_shoutout::<H, A, S>))
        .route("/health", web::get().to(health));
}

/// Builds the trigger API server on an already bound listener.
///
/// The returned [`Server`] does nothing until it is awaited or spawned.
pub fn serve_api<H, A, S>(
    pipeline: ShoutoutPipeline<H, A, S>,
    listener: TcpListener,
) -> std::io::Result<Server>
where
    H: Host + 'static,
    A: ClipAccessSource + 'static,
    S: Sleeper + 'static,
{
    let pipeline = web::Data::new(pipeline);
    info!("Shout-out API listening on {}", listener.local_addr()?);
    let server = HttpServer::new(move || {
        App::new()
            .app_data(pipeline.clone())
            .configure(routes::<H, A, S>)
    })
    .listen(listener)?
    .run();
    Ok(server)
}

/// Run the trigger API server until it shuts down
///
/// # Example
/// ```no_run
/// # async fn start<H: clip_shoutout::Host + 'static>(host: H) -> std::io::Result<()> {
/// let pipeline = clip_shoutout::ShoutoutPipeline::with_host(host);
/// clip_shoutout::api::run_api_server(pipeline, ("0.0.0.0", 8080)).await
/// # }
/// ```
pub async fn run_api_server<H, A, S>(
    pipeline: ShoutoutPipeline<H, A, S>,
    addr: (&str, u16),
) -> std::io::Result<()>
where
    H: Host + 'static,
    A: ClipAccessSource + 'static,
    S: Sleeper + 'static,
{
    let listener = TcpListener::bind(addr)?;
    serve_api(pipeline, listener)?.await
}
