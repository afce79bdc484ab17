use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::{Value, json};
use tracker_auth::{AuthError, SESSION_KEY, VIEWER_KEYS};
use tracker_graphql::{GraphqlClientError, PageLimit};

use anilist::config::RateLimitSettings;
use anilist::progress::ChapterReadAction;
use anilist::search::SearchQuery;
use anilist::{
    AniListConfig, AniListConnector, AniListError, DiscoveryProviding, FilterId,
    FilterSelection, InclusionMode, ProgressProviding, SearchProviding, SearchVariables,
    SettingsProviding,
};
use tracker_testkit::{MockGraphqlServer, fixtures, init_test_tracing};

/// Far enough ahead that the system clock never reaches it during a test run.
const FAR_FUTURE: f64 = 4_000_000_000.0;

fn connector(server: &MockGraphqlServer) -> AniListConnector {
    let config = AniListConfig {
        endpoint: server.endpoint(),
        timeout: Duration::from_secs(5),
        rate_limit: RateLimitSettings {
            requests: 100,
            interval: Duration::from_secs(1),
        },
        ..AniListConfig::default()
    };
    AniListConnector::new(config).unwrap()
}

fn viewer() -> Value {
    json!({"Viewer": {
        "avatar": {"large": null},
        "createdAt": 1_500_000_000,
        "id": 5137,
        "name": "reader",
        "mediaListOptions": {
            "rowOrder": "title",
            "scoreFormat": "POINT_100",
            "mangaList": {
                "advancedScoringEnabled": false,
                "advancedScoring": [],
                "customLists": [],
                "splitCompletedSectionByFormat": true,
                "sectionOrder": ["Reading"]
            }
        },
        "options": {
            "activityMergeTime": 0,
            "disabledListActivity": [],
            "displayAdultContent": true,
            "staffNameLanguage": "NATIVE",
            "titleLanguage": "ENGLISH"
        }
    }})
}

fn list_entry(root: &str, progress: u32) -> Value {
    json!({ root: {
        "id": 11,
        "status": "CURRENT",
        "score": 0,
        "progress": progress,
        "progressVolumes": 0,
        "repeat": 0,
        "private": false,
        "notes": null,
        "hiddenFromStatusLists": false,
        "customLists": null,
        "advancedScores": null,
        "startedAt": {"year": null, "month": null, "day": null},
        "completedAt": {"year": null, "month": null, "day": null},
        "createdAt": 1_600_000_000,
        "updatedAt": 1_700_000_000
    }})
}

#[tokio::test]
async fn login_then_sync_read_chapters() {
    init_test_tracing();
    let server = MockGraphqlServer::start().await;
    server.respond_to("viewerQuery", viewer()).await;
    server
        .respond_to("titleProgressQuery", list_entry("MediaList", 3))
        .await;
    server
        .respond_to("saveProgressMutation", list_entry("SaveMediaListEntry", 9))
        .await;
    let connector = connector(&server);

    let viewer = connector
        .login(&fixtures::bearer_token(FAR_FUTURE))
        .await
        .unwrap();
    assert_eq!(viewer.id, 5137);
    assert_eq!(
        connector
            .store()
            .get("viewer-split-completed-list-by-format")
            .as_deref(),
        Some("true")
    );

    let outcome = connector
        .process_read_actions(&[ChapterReadAction {
            id: "read-9".into(),
            manga_id: "30013".into(),
            chapter_num: 9.0,
            chapter_volume: None,
        }])
        .await
        .unwrap();
    assert_eq!(outcome.successful_items, ["read-9"]);

    let bodies = server.received_bodies().await;
    assert_eq!(bodies.len(), 3);
    assert_eq!(
        bodies[2]["variables"],
        json!({"mediaId": 30013, "progress": 9})
    );
    assert_eq!(connector.metrics().requests_success, 3);
}

#[tokio::test]
async fn search_pages_until_the_last_one() {
    init_test_tracing();
    let server = MockGraphqlServer::start().await;
    server
        .respond_to(
            "\"page\":2",
            fixtures::page_data(vec![fixtures::media(3, "Pluto")], false),
        )
        .await;
    server
        .respond_to(
            "\"page\":1",
            fixtures::page_data(
                vec![fixtures::media(1, "Monster"), fixtures::media(2, "20th Century Boys")],
                true,
            ),
        )
        .await;
    let connector = connector(&server);

    let first = connector
        .search_results(
            &SearchQuery {
                title: Some("urasawa".into()),
                filters: vec![(
                    FilterId::Genres,
                    FilterSelection::MultiSelect {
                        selections: BTreeMap::from([(
                            "Mystery".to_string(),
                            InclusionMode::Included,
                        )]),
                    },
                )],
            },
            None,
            None,
        )
        .await
        .unwrap();
    assert_eq!(first.items.len(), 2);
    assert_eq!(first.next_page, Some(2));

    let everything = connector
        .pages()
        .fetch_all(&SearchVariables::default(), false, Some(PageLimit::new(10)))
        .await
        .unwrap();
    let titles: Vec<&str> = everything.iter().map(|item| item.title.as_str()).collect();
    assert_eq!(titles, ["Monster", "20th Century Boys", "Pluto"]);
}

#[tokio::test]
async fn missing_progress_is_not_an_error() {
    let server = MockGraphqlServer::start().await;
    server.respond_with_error(404, "Not Found.").await;
    let connector = connector(&server);
    connector
        .store()
        .set(SESSION_KEY, Some(fixtures::bearer_token(FAR_FUTURE)));
    connector.store().set("viewer-id", Some("5137".into()));

    assert_eq!(connector.manga_progress("1").await.unwrap(), None);
    assert!(
        connector
            .discover_section_items("trending-now", None)
            .await
            .unwrap_err()
            .is_not_found()
    );
}

#[tokio::test]
async fn expired_session_is_cleared_before_sending() {
    let server = MockGraphqlServer::start().await;
    let connector = connector(&server);
    let store = connector.store();
    store.set(SESSION_KEY, Some(fixtures::bearer_token(1_000_000_000.0)));
    for key in VIEWER_KEYS {
        store.set(key, Some("cached".into()));
    }

    let err = connector
        .search_results(
            &SearchQuery {
                title: None,
                filters: vec![(
                    FilterId::TrackedTitles,
                    FilterSelection::MultiSelect {
                        selections: BTreeMap::from([(
                            "tracked-titles".to_string(),
                            InclusionMode::Included,
                        )]),
                    },
                )],
            },
            None,
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AniListError::Client(GraphqlClientError::Auth(AuthError::Expired { .. }))
    ));
    assert_eq!(store.get(SESSION_KEY), None);
    for key in VIEWER_KEYS {
        assert_eq!(store.get(key), None);
    }
    assert!(server.received_bodies().await.is_empty());
}
