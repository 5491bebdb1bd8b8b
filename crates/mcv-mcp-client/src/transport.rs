//! HTTP transport layer for the portal.

use reqwest::{header, Client, RequestBuilder, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

use mcv_mcp_core::{Error, PortalSettings, Result, SessionContext};
use mcv_mcp_normalizer::is_login_page;

/// Form fields of a POST request.
pub type Form<'a> = [(&'a str, String)];

/// HTTP transport for portal requests.
///
/// Every request carries the session cookie, is attempted exactly once, and
/// relies on the configured timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    session: Arc<SessionContext>,
}

impl HttpTransport {
    /// Create a new transport for the given portal settings and session.
    pub fn new(settings: &PortalSettings, session: Arc<SessionContext>) -> Result<Self> {
        let base_url = settings.base_url()?;

        let mut cookie = header::HeaderValue::from_str(session.cookie()).map_err(|_| {
            Error::Config("MCV_COOKIE contains characters not allowed in an HTTP header".to_string())
        })?;
        cookie.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::COOKIE, cookie);

        let client = Client::builder()
            .timeout(settings.timeout())
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    /// Base URL of the portal.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The session this transport authenticates with.
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Build an absolute URL for the given path.
    pub fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::Config(format!("invalid portal path '{path}': {e}")))
    }

    /// Send a request once and return the body of a successful response.
    ///
    /// A rejected cookie shows up either as 401/403 or as a redirect to the
    /// login form; both are reported as [`Error::Authentication`].
    async fn execute(&self, request: RequestBuilder) -> Result<String> {
        let response = request.send().await.map_err(network_error)?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!("Portal rejected the session cookie (HTTP {})", status.as_u16());
            return Err(session_rejected(&format!("HTTP {}", status.as_u16())));
        }

        let landed_on_login = is_login_url(response.url());
        let body = response.text().await.map_err(network_error)?;

        if !status.is_success() {
            warn!("Portal answered HTTP {}", status.as_u16());
            return Err(Error::unexpected_format(
                status.as_u16(),
                format!("unexpected HTTP status {status}"),
                &body,
            ));
        }

        if landed_on_login || is_login_page(&body) {
            warn!("Portal answered with its login page");
            return Err(session_rejected("redirected to the login page"));
        }

        Ok(body)
    }

    /// Execute a GET request and return the response text.
    pub async fn get_text(&self, path: &str) -> Result<String> {
        let url = self.url(path)?;
        debug!("GET {}", path);
        self.execute(self.client.get(url)).await
    }

    /// Execute a form POST request and return the response text.
    pub async fn post_form_text(&self, path: &str, form: &Form<'_>) -> Result<String> {
        let url = self.url(path)?;
        debug!("POST {} ({} fields)", path, form.len());
        self.execute(self.client.post(url).form(form)).await
    }

    /// Execute a form POST request and parse the response as JSON.
    ///
    /// The portal often labels JSON as `text/html`, so the body is parsed
    /// regardless of content type.
    pub async fn post_form_json(&self, path: &str, form: &Form<'_>) -> Result<Value> {
        let body = self.post_form_text(path, form).await?;
        serde_json::from_str(&body).map_err(|e| {
            warn!("Expected JSON from {}: {}", path, e);
            Error::unexpected_format(200, format!("expected JSON from {path}: {e}"), &body)
        })
    }
}

fn session_rejected(reason: &str) -> Error {
    Error::Authentication(format!(
        "the portal rejected the session cookie ({reason}); \
         the session is invalid or expired, please provide a new MCV_COOKIE"
    ))
}

fn is_login_url(url: &Url) -> bool {
    url.path().to_ascii_lowercase().contains("login")
        || url
            .query()
            .is_some_and(|q| q.to_ascii_lowercase().contains("login"))
}

fn network_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Network(format!("request timed out: {e}"))
    } else {
        Error::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_transport(base_url: &str) -> HttpTransport {
        let settings = PortalSettings {
            base_url: base_url.to_string(),
            timeout_secs: 5,
            ..PortalSettings::default()
        };
        let session = Arc::new(SessionContext::new("mcv_session=abc123; csrf=xyz").unwrap());
        HttpTransport::new(&settings, session).unwrap()
    }

    #[tokio::test]
    async fn test_cookie_header_attached() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/courseville/course/1/announcement"))
            .and(header("cookie", "mcv_session=abc123; csrf=xyz"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let transport = create_transport(&server.uri());
        let body = transport
            .get_text("/courseville/course/1/announcement")
            .await
            .unwrap();
        assert_eq!(body, "<html>ok</html>");
    }

    #[tokio::test]
    async fn test_query_style_path() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("q", "courseville/course/42"))
            .respond_with(ResponseTemplate::new(200).set_body_string("course page"))
            .mount(&server)
            .await;

        let transport = create_transport(&server.uri());
        let body = transport.get_text("/?q=courseville/course/42").await.unwrap();
        assert_eq!(body, "course page");
    }

    #[tokio::test]
    async fn test_post_form_json() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/courseville/ajax/cvhomepanel_get_filter"))
            .and(body_string_contains("yearsem=2567%2F1"))
            .and(body_string_contains("role=student"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(json!({"status": 1, "data": []}).to_string())
                    .insert_header("content-type", "text/html"),
            )
            .mount(&server)
            .await;

        let transport = create_transport(&server.uri());
        let form = [("yearsem", "2567/1".to_string()), ("role", "student".to_string())];
        let value = transport
            .post_form_json("/courseville/ajax/cvhomepanel_get_filter", &form)
            .await
            .unwrap();
        assert_eq!(value["status"], 1);
    }

    #[tokio::test]
    async fn test_unauthorized_is_authentication_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let transport = create_transport(&server.uri());
        let err = transport.get_text("/").await.unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
        assert!(err.to_string().contains("MCV_COOKIE"));
    }

    #[tokio::test]
    async fn test_forbidden_is_authentication_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let transport = create_transport(&server.uri());
        let err = transport
            .post_form_json("/courseville/ajax/cvhomepanel_get_filter", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
    }

    #[tokio::test]
    async fn test_redirect_to_login_is_authentication_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/courseville/course/1/announcement"))
            .respond_with(ResponseTemplate::new(302).insert_header("location", "/login"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>Please sign in</html>"))
            .mount(&server)
            .await;

        let transport = create_transport(&server.uri());
        let err = transport
            .get_text("/courseville/course/1/announcement")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
        assert!(err.to_string().contains("login page"));
    }

    #[tokio::test]
    async fn test_login_form_body_is_authentication_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<form action="/api/login"><input type="password" name="password"></form>"#,
            ))
            .mount(&server)
            .await;

        let transport = create_transport(&server.uri());
        let err = transport
            .post_form_json("/courseville/ajax/cvhomepanel_get_filter", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
    }

    #[test]
    fn test_login_urls() {
        let url = |s: &str| Url::parse(s).unwrap();
        assert!(is_login_url(&url("https://www.mycourseville.com/api/login")));
        assert!(is_login_url(&url("https://www.mycourseville.com/?q=courseville/login")));
        assert!(!is_login_url(&url("https://www.mycourseville.com/?q=courseville/course/1")));
    }

    #[tokio::test]
    async fn test_server_error_keeps_status_and_snippet() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal failure"))
            .mount(&server)
            .await;

        let transport = create_transport(&server.uri());
        match transport.get_text("/").await.unwrap_err() {
            Error::UnexpectedFormat {
                status, snippet, ..
            } => {
                assert_eq!(status, 500);
                assert_eq!(snippet, "Internal failure");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_format_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;

        let transport = create_transport(&server.uri());
        let err = transport
            .post_form_json("/?q=courseville/ajax/loadmoreassignmentrows", &[])
            .await
            .unwrap_err();
        match err {
            Error::UnexpectedFormat { snippet, .. } => assert_eq!(snippet, "<html>login</html>"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_single_attempt_on_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let transport = create_transport(&server.uri());
        assert!(transport.get_text("/").await.is_err());
    }

    #[tokio::test]
    async fn test_timeout_is_network_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let settings = PortalSettings {
            base_url: server.uri(),
            timeout_secs: 1,
            ..PortalSettings::default()
        };
        let session = Arc::new(SessionContext::new("a=1").unwrap());
        let transport = HttpTransport::new(&settings, session).unwrap();

        let err = transport.get_text("/").await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let transport = create_transport("http://127.0.0.1:1");
        let err = transport.get_text("/").await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }

    #[test]
    fn test_invalid_cookie_characters() {
        let settings = PortalSettings::default();
        let session = Arc::new(SessionContext::new("a=line\nbreak").unwrap());
        let err = HttpTransport::new(&settings, session).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_url_join() {
        let transport = create_transport("https://www.mycourseville.com");
        assert_eq!(
            transport.url("/?q=courseville/worksheet/1/2").unwrap().as_str(),
            "https://www.mycourseville.com/?q=courseville/worksheet/1/2"
        );
    }
}
