// Redirect resolution for log-download endpoints.
// These routes answer with a redirect to a time-limited URL instead of JSON.

use reqwest::{StatusCode, header::LOCATION};
use tracing::debug;
use url::Url;

use crate::client::{Client, ResponseMeta};
use crate::error::{CrankError, Result};

impl Client {
    /// Resolve an endpoint that answers with a redirect to a download URL.
    ///
    /// The request goes over the raw transport so redirects are observed
    /// rather than followed. With `follow_redirects` set, a single
    /// 301 Moved Permanently hop to a relocated endpoint is taken; the
    /// chain must then end in 302 Found, whose `Location` is returned
    /// without being fetched. A 302 target that would itself redirect is
    /// the caller's problem — downloading is out of scope here.
    pub(crate) async fn resolve_download_url(
        &self,
        path: &str,
        follow_redirects: bool,
    ) -> Result<(Url, ResponseMeta)> {
        let mut url = self.endpoint_url(path, None)?;
        let mut follow = follow_redirects;

        loop {
            let response = self.raw_get(url).await?;
            let status = response.status();
            let meta = ResponseMeta::from_response(&response);
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_owned();
            // Release the connection before acting on the status.
            drop(response);

            if follow && status == StatusCode::MOVED_PERMANENTLY {
                debug!(%location, "following permanent redirect");
                url = Url::parse(&location)?;
                follow = false;
                continue;
            }

            if status != StatusCode::FOUND {
                return Err(CrankError::UnexpectedStatus {
                    status: status.to_string(),
                    meta,
                });
            }

            return Ok((Url::parse(&location)?, meta));
        }
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::client::{Client, Config};
    use crate::error::CrankError;

    fn client_for(server: &MockServer) -> Client {
        Client::new(Config::new().with_base_url(server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_found_location_returned() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/o/r/actions/jobs/399444496/logs"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("location", "https://storage.example.com/logs.txt?sig=abc"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let (url, meta) = client.job_logs_url("o", "r", 399444496, false).await.unwrap();

        assert_eq!(url.as_str(), "https://storage.example.com/logs.txt?sig=abc");
        assert_eq!(meta.status, 302);
    }

    #[tokio::test]
    async fn test_permanent_redirect_followed_once() {
        let server = MockServer::start().await;
        let relocated = format!("{}/relocated/logs", server.uri());

        Mock::given(method("GET"))
            .and(path("/repos/o/r/actions/jobs/1/logs"))
            .respond_with(ResponseTemplate::new(301).insert_header("location", relocated.as_str()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/relocated/logs"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("location", "https://storage.example.com/final.txt"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let (url, _) = client.job_logs_url("o", "r", 1, true).await.unwrap();

        assert_eq!(url.as_str(), "https://storage.example.com/final.txt");
    }

    #[tokio::test]
    async fn test_second_permanent_redirect_is_an_error() {
        let server = MockServer::start().await;
        let first_hop = format!("{}/relocated/logs", server.uri());
        let second_hop = format!("{}/relocated/again", server.uri());

        Mock::given(method("GET"))
            .and(path("/repos/o/r/actions/jobs/1/logs"))
            .respond_with(ResponseTemplate::new(301).insert_header("location", first_hop.as_str()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/relocated/logs"))
            .respond_with(ResponseTemplate::new(301).insert_header("location", second_hop.as_str()))
            .expect(1)
            .mount(&server)
            .await;
        // The chain stops at the second 301; this must never be requested.
        Mock::given(method("GET"))
            .and(path("/relocated/again"))
            .respond_with(ResponseTemplate::new(302))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.job_logs_url("o", "r", 1, true).await.unwrap_err();

        match err {
            CrankError::UnexpectedStatus { status, .. } => {
                assert!(status.contains("301"), "unexpected status text: {}", status);
            }
            other => panic!("expected UnexpectedStatus, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_permanent_redirect_not_followed_when_disabled() {
        let server = MockServer::start().await;
        let relocated = format!("{}/relocated/logs", server.uri());

        Mock::given(method("GET"))
            .and(path("/repos/o/r/actions/jobs/1/logs"))
            .respond_with(ResponseTemplate::new(301).insert_header("location", relocated.as_str()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.job_logs_url("o", "r", 1, false).await.unwrap_err();

        assert!(matches!(err, CrankError::UnexpectedStatus { .. }));
    }

    #[tokio::test]
    async fn test_ok_status_is_unexpected() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/o/r/actions/jobs/1/logs"))
            .respond_with(ResponseTemplate::new(200).set_body_string("raw log text"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.job_logs_url("o", "r", 1, true).await.unwrap_err();

        match err {
            CrankError::UnexpectedStatus { status, meta } => {
                assert!(status.contains("200"));
                assert_eq!(meta.status, 200);
            }
            other => panic!("expected UnexpectedStatus, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_location_is_a_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/o/r/actions/jobs/1/logs"))
            .respond_with(ResponseTemplate::new(302))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.job_logs_url("o", "r", 1, false).await.unwrap_err();

        assert!(matches!(err, CrankError::UrlParse(_)));
    }

    #[tokio::test]
    async fn test_run_logs_use_the_same_resolution() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/o/r/actions/runs/29679449/logs"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("location", "https://storage.example.com/archive.zip"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let (url, _) = client.run_logs_url("o", "r", 29679449, true).await.unwrap();

        assert_eq!(url.as_str(), "https://storage.example.com/archive.zip");
    }
}
