//! Socket HTTP client.
//!
//! One request per socket: connect, write the hand-built request, read until
//! the server closes, parse. Every step is written to the trace collector.

use std::io::Write;
use std::sync::Arc;

use log::Level;
use url::Url;

use crate::config::MAX_RESPONSE_SIZE;
use crate::error_handling::HttpError;
use crate::http::connection::{read_to_end, Connector};
use crate::http::cookies::CookieJar;
use crate::http::request::{build_get, build_patch, build_post, CheckHeaders, HttpRequest};
use crate::http::response::{parse_response, ResponseRecord};
use crate::trace::TraceCollector;

const TAG: &str = "SocketClient";

/// Hand-rolled HTTP/1.1 client over raw sockets.
pub struct SocketClient {
    connector: Connector,
    tracer: Arc<TraceCollector>,
    user_agent: String,
}

impl SocketClient {
    pub fn new(connector: Connector, tracer: Arc<TraceCollector>, user_agent: String) -> Self {
        Self {
            connector,
            tracer,
            user_agent,
        }
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Sends a check GET to `url` with the jar's matching cookies.
    ///
    /// Cookies set by the response are added to `jar`.
    pub fn get(
        &self,
        url: &Url,
        jar: &mut CookieJar,
        headers: &CheckHeaders,
    ) -> Result<ResponseRecord, HttpError> {
        let request = build_get(url, &self.user_agent, headers, jar);
        self.send_and_receive(url, &request, jar)
    }

    /// Sends a POST to `url` with caller headers and an optional body.
    pub fn post(
        &self,
        url: &Url,
        headers: &[(String, String)],
        body: Option<&str>,
        jar: &mut CookieJar,
    ) -> Result<ResponseRecord, HttpError> {
        let request = build_post(url, &self.user_agent, headers, body, jar);
        self.send_and_receive(url, &request, jar)
    }

    /// Sends a JSON patch adding `payload` at `/payload`.
    pub fn patch(
        &self,
        url: &Url,
        payload: &str,
        jar: &mut CookieJar,
    ) -> Result<ResponseRecord, HttpError> {
        let request = build_patch(url, &self.user_agent, payload);
        self.send_and_receive(url, &request, jar)
    }

    /// Performs one exchange on a fresh socket.
    ///
    /// The socket is closed when this returns, on success and on error.
    ///
    /// # Errors
    ///
    /// Connection, TLS and I/O failures are returned as `HttpError`; a
    /// response without a status line is `HttpError::EmptyResponse`.
    pub fn send_and_receive(
        &self,
        url: &Url,
        request: &HttpRequest,
        jar: &mut CookieJar,
    ) -> Result<ResponseRecord, HttpError> {
        let host = url.host_str().unwrap_or_default();
        let port = url.port_or_known_default().unwrap_or_default();
        self.tracer.add_debug(
            Level::Debug,
            TAG,
            &format!("start : {} {} {}", host, port, url.scheme()),
        );
        self.tracer.add_trace(&format!(
            "\nStart connection {} {} {} {}",
            host,
            port,
            url.scheme(),
            self.tracer.timestamp()
        ));

        let mut stream = self.connector.connect(url)?;
        let peer = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "?".to_string());
        self.tracer
            .add_debug(Level::Debug, TAG, &format!("Client connected : {}", peer));
        self.tracer
            .add_trace(&format!("Connected {}", self.tracer.timestamp()));

        let wire = request.to_wire();
        self.tracer.add_debug(
            Level::Debug,
            TAG,
            &format!("Client sending \n{}", request.to_log_string()),
        );
        self.tracer.add_trace(&wire);
        stream.write_all(wire.as_bytes())?;
        stream.flush()?;

        self.tracer
            .add_trace(&format!("Response - {}", self.tracer.timestamp()));
        let raw = read_to_end(&mut stream, MAX_RESPONSE_SIZE)?;
        drop(stream);
        self.tracer
            .add_debug(Level::Debug, TAG, &format!("closed the connection {}", peer));

        let text = String::from_utf8_lossy(&raw);
        for line in text.split('\n') {
            self.tracer.add_trace(line.strip_suffix('\r').unwrap_or(line));
        }

        let record = parse_response(&text, url, jar)?;
        self.tracer.add_debug(
            Level::Debug,
            TAG,
            &format!(
                "Status - {}\nBody - {}",
                record.status,
                record.body.as_deref().unwrap_or("")
            ),
        );
        self.tracer.add_trace(&format!(
            "Status - {} {}",
            record.status,
            self.tracer.timestamp()
        ));
        if let Some(next) = &record.redirect {
            self.tracer
                .add_debug(Level::Debug, TAG, &format!("Found redirect {}", next));
        }

        Ok(record)
    }
}
