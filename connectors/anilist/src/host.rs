//! JSON line protocol between the host and the connector.
//!
//! Each request is one line `{"id", "method", "params"}`; each response is one
//! line `{"id", "result"}` or `{"id", "error": {"code", "message"}}`.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::capabilities::{
    DiscoveryProviding, MangaProviding, ProgressProviding, SearchProviding, SettingsProviding,
};
use crate::connector::AniListConnector;
use crate::error::{AniListError, AniListResult};
use crate::filters::{FilterId, FilterSelection};
use crate::progress::{ChapterReadAction, ProgressUpdate};
use crate::search::SearchQuery;
use crate::types::MediaSort;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageParams {
    section_id: Option<String>,
    page: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchParams {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    filters: Map<String, Value>,
    #[serde(default)]
    page: Option<u32>,
    #[serde(default)]
    sort: Option<MediaSort>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MangaParams {
    manga_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveParams {
    manga_id: String,
    #[serde(default)]
    update: ProgressUpdate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteParams {
    list_entry_id: String,
}

#[derive(Debug, Deserialize)]
struct SyncParams {
    actions: Vec<ChapterReadAction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginParams {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct SynonymsParams {
    enabled: Option<bool>,
}

fn params<T: DeserializeOwned>(params: Value) -> AniListResult<T> {
    Ok(serde_json::from_value(params)?)
}

fn to_value<T: serde::Serialize>(value: &T) -> AniListResult<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Parse the untyped filter map into selections.
fn selections(filters: Map<String, Value>) -> AniListResult<Vec<(FilterId, FilterSelection)>> {
    filters
        .into_iter()
        .map(|(id, value)| {
            let id: FilterId = id.parse()?;
            Ok((id, FilterSelection::parse(id, &value)?))
        })
        .collect()
}

/// Run one method.
pub async fn dispatch(
    connector: &AniListConnector,
    method: &str,
    raw: Value,
) -> AniListResult<Value> {
    debug!(method, "dispatching");
    match method {
        "discover.sections" => to_value(&connector.discover_sections()),
        "discover.items" => {
            let p: PageParams = params(raw)?;
            let section = p.section_id.unwrap_or_default();
            to_value(&connector.discover_section_items(&section, p.page).await?)
        }
        "search.filters" => to_value(&connector.search_filters().await?),
        "search.sorting" => to_value(&connector.sorting_options()),
        "search.results" => {
            let p: SearchParams = params(raw)?;
            let query = SearchQuery {
                title: p.title,
                filters: selections(p.filters)?,
            };
            to_value(&connector.search_results(&query, p.page, p.sort).await?)
        }
        "manga.details" => {
            let p: MangaParams = params(raw)?;
            to_value(&connector.manga_details(&p.manga_id).await?)
        }
        "progress.get" => {
            let p: MangaParams = params(raw)?;
            to_value(&connector.manga_progress(&p.manga_id).await?)
        }
        "progress.entry" => {
            let p: MangaParams = params(raw)?;
            to_value(&connector.progress_entry(&p.manga_id).await?)
        }
        "progress.save" => {
            let p: SaveParams = params(raw)?;
            to_value(&connector.save_progress(&p.manga_id, &p.update).await?)
        }
        "progress.delete" => {
            let p: DeleteParams = params(raw)?;
            let deleted = connector.delete_progress(&p.list_entry_id).await?;
            Ok(json!({ "deleted": deleted }))
        }
        "progress.sync" => {
            let p: SyncParams = params(raw)?;
            to_value(&connector.process_read_actions(&p.actions).await?)
        }
        "settings.login" => {
            let p: LoginParams = params(raw)?;
            to_value(&connector.login(&p.access_token).await?)
        }
        "settings.logout" => {
            connector.logout();
            Ok(json!({}))
        }
        "settings.loginUrl" => Ok(json!({ "url": connector.login_url()? })),
        "settings.profile" => to_value(&connector.viewer_profile().await?),
        "settings.session" => {
            let claims = connector.session_claims()?;
            Ok(json!({
                "subject": claims.subject,
                "audience": claims.audience,
                "scopes": claims.scopes,
                "expiresAt": claims.expires_at_utc().to_rfc3339(),
            }))
        }
        "settings.synonyms" => {
            let p: SynonymsParams = params(raw)?;
            if let Some(enabled) = p.enabled {
                connector.set_show_synonyms(enabled);
            }
            Ok(json!({ "enabled": connector.show_synonyms() }))
        }
        _ => Err(AniListError::UnknownMethod(method.to_string())),
    }
}

/// Handle one request line and build its response.
pub async fn handle_message(connector: &AniListConnector, line: &str) -> Value {
    let request: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(err) => {
            return json!({
                "id": null,
                "error": { "code": "json", "message": format!("Invalid JSON: {err}") }
            });
        }
    };

    let id = request.get("id").cloned().unwrap_or(Value::Null);
    let method = request
        .get("method")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let raw = request
        .get("params")
        .cloned()
        .filter(|params| !params.is_null())
        .unwrap_or_else(|| json!({}));

    match dispatch(connector, method, raw).await {
        Ok(result) => json!({ "id": id, "result": result }),
        Err(err) => json!({
            "id": id,
            "error": { "code": err.code(), "message": err.to_string() }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tracker_auth::{FixedClock, MemorySessionStore};
    use tracker_testkit::{ScriptedTransport, fixtures};

    use crate::config::AniListConfig;

    fn connector(transport: &ScriptedTransport) -> AniListConnector {
        AniListConnector::with_parts(
            AniListConfig::default(),
            Arc::new(transport.clone()),
            Arc::new(MemorySessionStore::new()),
            Arc::new(FixedClock(1_700_000_000.0)),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_search_results_parse_filters_at_the_boundary() {
        let transport = ScriptedTransport::new();
        transport.push_data(fixtures::page_data(vec![fixtures::media(9, "Monster")], false));
        let connector = connector(&transport);

        let line = json!({
            "id": 1,
            "method": "search.results",
            "params": {
                "title": "monster",
                "sort": "POPULARITY_DESC",
                "filters": {
                    "genres": {"Mystery": "included", "Ecchi": "excluded"},
                    "chapter-counts": "100-200",
                    "country-of-origin": "JP"
                }
            }
        })
        .to_string();
        let response = handle_message(&connector, &line).await;

        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["items"][0]["title"], "Monster");
        assert_eq!(response["result"]["nextPage"], Value::Null);
        assert_eq!(
            transport.request_variables(0),
            json!({
                "page": 1,
                "search": "monster",
                "sort": ["POPULARITY_DESC"],
                "countryOfOrigin": "JP",
                "chaptersGreater": 100,
                "chaptersLesser": 200,
                "genreIn": ["Mystery"],
                "genreNotIn": ["Ecchi"]
            })
        );
    }

    #[tokio::test]
    async fn test_errors_carry_code_and_message() {
        let connector = connector(&ScriptedTransport::new());

        let response = handle_message(
            &connector,
            r#"{"id": "a", "method": "progress.get", "params": {"mangaId": "1"}}"#,
        )
        .await;
        assert_eq!(response["id"], "a");
        assert_eq!(response["error"]["code"], "auth");
        assert!(
            response["error"]["message"]
                .as_str()
                .unwrap()
                .contains("log in")
        );

        let response = handle_message(&connector, r#"{"id": 2, "method": "teleport"}"#).await;
        assert_eq!(response["error"]["code"], "invalid_request");

        let response = handle_message(&connector, "{not json").await;
        assert_eq!(response["error"]["code"], "json");
        assert_eq!(response["id"], Value::Null);
    }

    #[tokio::test]
    async fn test_bad_filter_shape_is_invalid_request() {
        let transport = ScriptedTransport::new();
        let connector = connector(&transport);

        let response = handle_message(
            &connector,
            r#"{"id": 3, "method": "search.results", "params": {"filters": {"genres": "Action"}}}"#,
        )
        .await;

        assert_eq!(response["error"]["code"], "invalid_request");
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_synonyms_setting() {
        let connector = connector(&ScriptedTransport::new());

        let response = handle_message(
            &connector,
            r#"{"id": 4, "method": "settings.synonyms", "params": {"enabled": true}}"#,
        )
        .await;
        assert_eq!(response["result"]["enabled"], true);

        let response =
            handle_message(&connector, r#"{"id": 5, "method": "settings.synonyms"}"#).await;
        assert_eq!(response["result"]["enabled"], true);
    }

    #[tokio::test]
    async fn test_sections_listing() {
        let connector = connector(&ScriptedTransport::new());
        let response =
            handle_message(&connector, r#"{"id": 6, "method": "discover.sections"}"#).await;
        assert_eq!(response["result"][0]["id"], "trending-now");
        assert_eq!(response["result"][0]["style"], "featured");
    }
}
