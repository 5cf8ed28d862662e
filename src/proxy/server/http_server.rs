use crate::proxy::server::ServerContext;
use crate::proxy::{Decision, Error};
use http_body_util::Empty;
use hyper::body::{Bytes, Incoming};
use hyper::header::WWW_AUTHENTICATE;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::fmt::Debug;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::pin;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument};

pub type ResponseBody = Empty<Bytes>;

const BASIC_CHALLENGE: &str = r#"Basic realm="AuthProxy", charset="UTF-8""#;

/// Serves every request of one connection until the client hangs up, the
/// query timeout elapses or a shutdown is broadcast. The connection is then
/// given the grace period to finish its in-flight request.
pub async fn serve_request<S>(
    stream: TokioIo<S>,
    context: Arc<ServerContext>,
    timeouts: Arc<[Duration; 2]>,
    remote_address: SocketAddr,
    mut shutdown: watch::Receiver<bool>,
) where
    S: Unpin + AsyncWrite + AsyncRead + Send + Debug + 'static,
{
    let conn = http1::Builder::new().serve_connection(
        stream,
        service_fn(move |request| handle_request(Arc::clone(&context), request)),
    );
    pin!(conn);

    let [query_timeout, grace_period] = *timeouts;

    tokio::select! {
        res = conn.as_mut() => {
            match res {
                Ok(()) => debug!("Connection from {remote_address} closed"),
                Err(error) => debug!("Error serving connection from {remote_address}: {error}"),
            }
            return;
        }
        () = tokio::time::sleep(query_timeout) => {
            debug!("Query timeout reached for {remote_address}, calling conn.graceful_shutdown");
        }
        // A closed channel means the listener stopped without draining.
        Ok(()) = shutdown.changed() => {
            debug!("Shutdown requested, calling conn.graceful_shutdown for {remote_address}");
        }
    }

    conn.as_mut().graceful_shutdown();
    match tokio::time::timeout(grace_period, conn.as_mut()).await {
        Ok(Ok(())) => debug!("Connection from {remote_address} closed gracefully"),
        Ok(Err(error)) => debug!("Error serving connection from {remote_address}: {error}"),
        Err(_) => debug!("Grace period elapsed, dropping connection from {remote_address}"),
    }
}

#[instrument(skip_all, fields(method = %request.method(), path = %request.uri().path()))]
async fn handle_request(
    context: Arc<ServerContext>,
    request: Request<Incoming>,
) -> Result<Response<ResponseBody>, Infallible> {
    let start_time = Instant::now();
    let method = request.method().to_owned();
    let path = request.uri().path().to_owned();

    let response = match router(&context, request).await {
        Ok(response) => response,
        Err(error) => error_to_response(&error),
    };

    let elapsed = start_time.elapsed();
    let status = response.status();

    let log = format!("{elapsed:?} - {status} {method} {path}");
    if status.is_server_error() {
        error!("{log}");
    } else {
        info!("{log}");
    }

    Ok(response)
}

async fn router(
    context: &ServerContext,
    request: Request<Incoming>,
) -> Result<Response<ResponseBody>, Error> {
    let (parts, _) = request.into_parts();

    let response = match context.authenticate_request(&parts).await? {
        Some(Decision::Allowed) => Response::builder()
            .status(StatusCode::OK)
            .body(Empty::new())?,
        Some(Decision::Denied) => Response::builder()
            .status(StatusCode::FORBIDDEN)
            .body(Empty::new())?,
        None => Response::builder()
            .status(StatusCode::UNAUTHORIZED)
            .header(WWW_AUTHENTICATE, BASIC_CHALLENGE)
            .body(Empty::new())?,
    };

    Ok(response)
}

fn status_response(status: StatusCode) -> Response<ResponseBody> {
    let mut response = Response::new(Empty::new());
    *response.status_mut() = status;
    response
}

pub fn error_to_response(error: &Error) -> Response<ResponseBody> {
    let status = match error {
        Error::MalformedCredentials(_) => StatusCode::BAD_REQUEST,
        Error::ProviderFault(_) => StatusCode::BAD_GATEWAY,
        Error::UnknownScheme { .. } | Error::Provider(_) | Error::Io(_) | Error::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    if status.is_server_error() {
        error!("{error}");
    } else {
        debug!("{error}");
    }

    status_response(status)
}
