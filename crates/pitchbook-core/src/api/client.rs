//! Client for the academy's hosted PostgREST database.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::{header, Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::rows::{collapse_attendance, AttendanceRecordRow, PlayerRow};
use super::ApiError;
use crate::models::{
    Attendance, AttendanceStatus, Evaluation, Plan, Player, SkillScores, Subscription,
};

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
#[cfg(not(test))]
const INITIAL_BACKOFF_MS: u64 = 1000;
#[cfg(test)]
const INITIAL_BACKOFF_MS: u64 = 5;

const PLAYERS_TABLE: &str = "players";
const EVALUATIONS_TABLE: &str = "evaluations";
const ATTENDANCE_TABLE: &str = "attendance";
const SUBSCRIPTIONS_TABLE: &str = "subscriptions";

const PREFER_REPRESENTATION: &str = "return=representation";
const PREFER_MERGE: &str = "resolution=merge-duplicates,return=representation";

/// Insert body for an evaluation; the overall rating is never stored.
#[derive(Serialize)]
struct EvaluationInsert<'a> {
    player_id: &'a str,
    #[serde(flatten)]
    scores: &'a SkillScores,
    evaluation_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<&'a str>,
}

/// Upsert body for attendance, also filling the legacy columns.
#[derive(Serialize)]
struct AttendanceUpsert<'a> {
    player_id: &'a str,
    session_date: NaiveDate,
    status: AttendanceStatus,
    is_present: bool,
    absence_reason: Option<&'a str>,
    notes: Option<&'a str>,
}

impl<'a> From<&'a Attendance> for AttendanceUpsert<'a> {
    fn from(a: &'a Attendance) -> Self {
        let absent = a.status == AttendanceStatus::Absent;
        Self {
            player_id: &a.player_id,
            session_date: a.session_date,
            status: a.status,
            is_present: !absent,
            absence_reason: if absent { a.notes.as_deref() } else { None },
            notes: a.notes.as_deref(),
        }
    }
}

#[derive(Serialize)]
struct SubscriptionInsert<'a> {
    player_id: &'a str,
    plan: Plan,
    amount: u64,
    paid_amount: u64,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

/// Clone is cheap - reqwest::Client shares its connection pool.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ApiClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        headers.insert("apikey", header::HeaderValue::from_str(&self.api_key)?);
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );
        Ok(headers)
    }

    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    /// Send a request, rebuilding and retrying it with exponential backoff
    /// while the server answers 429.
    async fn send_with_retry<F>(&self, url: &str, build: F) -> Result<reqwest::Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = build()
                .headers(self.auth_headers()?)
                .send()
                .await
                .map_err(ApiError::NetworkError)
                .with_context(|| format!("Failed to send request to {}", url))?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => return Ok(response),
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited.into());
                    }
                    warn!(url = url, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2;
                }
            }
        }
    }

    async fn get<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>> {
        let url = self.table_url(table);
        let response = self
            .send_with_retry(&url, || self.client.get(&url).query(&[("select", "*")]))
            .await?;
        let rows: Vec<T> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))?;
        debug!(table = table, count = rows.len(), "Fetched rows");
        Ok(rows)
    }

    async fn write<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: &B,
        prefer: &str,
    ) -> Result<Vec<T>> {
        let response = self
            .send_with_retry(url, || {
                self.client
                    .request(method.clone(), url)
                    .header("Prefer", prefer)
                    .json(body)
            })
            .await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    async fn write_one<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: &B,
    ) -> Result<T> {
        self.write::<T, B>(method, url, body, PREFER_REPRESENTATION)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::InvalidResponse(format!("Empty representation from {}", url)).into())
    }

    // ===== Reads =====

    /// Players whose team or position cannot be recognised are skipped.
    pub async fn fetch_players(&self) -> Result<Vec<Player>> {
        let rows: Vec<PlayerRow> = self.get(PLAYERS_TABLE).await.context("Failed to fetch players")?;
        Ok(rows.iter().filter_map(|r| r.to_player()).collect())
    }

    pub async fn fetch_evaluations(&self) -> Result<Vec<Evaluation>> {
        self.get(EVALUATIONS_TABLE).await.context("Failed to fetch evaluations")
    }

    /// Repeated rows for one player and session collapse to the last one.
    pub async fn fetch_attendance(&self) -> Result<Vec<Attendance>> {
        let rows: Vec<AttendanceRecordRow> = self
            .get(ATTENDANCE_TABLE)
            .await
            .context("Failed to fetch attendance")?;
        Ok(collapse_attendance(&rows))
    }

    pub async fn fetch_subscriptions(&self) -> Result<Vec<Subscription>> {
        self.get(SUBSCRIPTIONS_TABLE)
            .await
            .context("Failed to fetch subscriptions")
    }

    // ===== Writes =====

    /// An empty id is left for the server to assign.
    pub async fn insert_player(&self, player: &Player) -> Result<Player> {
        let url = self.table_url(PLAYERS_TABLE);
        let mut body = serde_json::to_value(player)?;
        if player.id.is_empty() {
            if let Some(fields) = body.as_object_mut() {
                fields.remove("id");
            }
        }
        let row: PlayerRow = self
            .write_one(Method::POST, &url, &body)
            .await
            .context("Failed to insert player")?;
        row.to_player()
            .ok_or_else(|| ApiError::InvalidResponse("Inserted player could not be read back".to_string()).into())
    }

    pub async fn update_player(&self, player: &Player) -> Result<Player> {
        let url = format!("{}?id=eq.{}", self.table_url(PLAYERS_TABLE), player.id);
        let row: PlayerRow = self
            .write_one(Method::PATCH, &url, player)
            .await
            .with_context(|| format!("Failed to update player {}", player.id))?;
        row.to_player()
            .ok_or_else(|| ApiError::InvalidResponse("Updated player could not be read back".to_string()).into())
    }

    /// The server assigns the id; the returned evaluation carries it.
    pub async fn insert_evaluation(&self, evaluation: &Evaluation) -> Result<Evaluation> {
        let url = self.table_url(EVALUATIONS_TABLE);
        let body = EvaluationInsert {
            player_id: &evaluation.player_id,
            scores: evaluation.scores(),
            evaluation_date: evaluation.evaluation_date,
            notes: evaluation.notes.as_deref(),
        };
        self.write_one(Method::POST, &url, &body)
            .await
            .context("Failed to insert evaluation")
    }

    /// Insert or replace attendance rows keyed by player and session date.
    pub async fn upsert_attendance(&self, records: &[Attendance]) -> Result<Vec<Attendance>> {
        let url = format!(
            "{}?on_conflict=player_id,session_date",
            self.table_url(ATTENDANCE_TABLE)
        );
        let body: Vec<AttendanceUpsert> = records.iter().map(AttendanceUpsert::from).collect();
        let rows: Vec<AttendanceRecordRow> = self
            .write(Method::POST, &url, &body, PREFER_MERGE)
            .await
            .context("Failed to record attendance")?;
        Ok(rows.iter().map(|r| r.to_attendance()).collect())
    }

    pub async fn insert_subscription(&self, subscription: &Subscription) -> Result<Subscription> {
        let url = self.table_url(SUBSCRIPTIONS_TABLE);
        let body = SubscriptionInsert {
            player_id: &subscription.player_id,
            plan: subscription.plan,
            amount: subscription.amount,
            paid_amount: subscription.paid_amount,
            start_date: subscription.start_date,
            end_date: subscription.end_date(),
        };
        self.write_one(Method::POST, &url, &body)
            .await
            .context("Failed to insert subscription")
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SkillScores;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Local server answering every request with `status`; returns its
    /// base URL and a request counter.
    fn serve_status(status: &'static str) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut line = String::new();
                while reader.read_line(&mut line).map(|n| n > 0).unwrap_or(false) {
                    if line == "\r\n" {
                        break;
                    }
                    line.clear();
                }
                counter.fetch_add(1, Ordering::SeqCst);
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                    status
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        (format!("http://{}", addr), hits)
    }

    #[tokio::test]
    async fn test_rate_limited_after_three_retries() {
        let (url, hits) = serve_status("429 Too Many Requests");
        let client = ApiClient::new(&url, "key").unwrap();

        let err = client.fetch_players().await.unwrap_err();
        assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::RateLimited)));
        assert_eq!(hits.load(Ordering::SeqCst), 1 + MAX_RATE_LIMIT_RETRIES as usize);
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let (url, hits) = serve_status("404 Not Found");
        let client = ApiClient::new(&url, "key").unwrap();

        let err = client.fetch_evaluations().await.unwrap_err();
        assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::NotFound(_))));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_connection_failure_is_network_error() {
        // Bind then drop to get a port nothing listens on
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let client = ApiClient::new(&format!("http://127.0.0.1:{}", port), "key").unwrap();

        let err = client.fetch_subscriptions().await.unwrap_err();
        assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::NetworkError(_))));
    }

    #[test]
    fn test_table_url_trims_trailing_slash() {
        let client = ApiClient::new("https://academy.example.co/", "key").unwrap();
        assert_eq!(
            client.table_url("players"),
            "https://academy.example.co/rest/v1/players"
        );
    }

    #[test]
    fn test_auth_headers_carry_key_twice() {
        let client = ApiClient::new("https://academy.example.co", "anon-key").unwrap();
        let headers = client.auth_headers().unwrap();
        assert_eq!(headers["apikey"], "anon-key");
        assert_eq!(headers[header::AUTHORIZATION], "Bearer anon-key");
    }

    #[test]
    fn test_evaluation_insert_omits_overall() {
        let evaluation = Evaluation::new(
            "",
            "p1",
            SkillScores::from_array([7; 10]),
            NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
            None,
        );
        let body = EvaluationInsert {
            player_id: &evaluation.player_id,
            scores: evaluation.scores(),
            evaluation_date: evaluation.evaluation_date,
            notes: evaluation.notes.as_deref(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["passing"], 7);
        assert_eq!(json["morale"], 7);
        assert!(json.get("overall").is_none());
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn test_attendance_upsert_fills_legacy_columns() {
        let record = Attendance {
            player_id: "p1".to_string(),
            session_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            status: AttendanceStatus::Absent,
            notes: Some("Sick".to_string()),
        };
        let json = serde_json::to_value(AttendanceUpsert::from(&record)).unwrap();
        assert_eq!(json["is_present"], false);
        assert_eq!(json["absence_reason"], "Sick");
        assert_eq!(json["status"], "absent");
    }
}
