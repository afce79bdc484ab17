//! Account and preference settings.

use async_trait::async_trait;
use tracing::{info, instrument, warn};
use tracker_auth::{BearerToken, Claims, ImplicitGrant, Session, SessionStore, TokenInspector};

use crate::capabilities::SettingsProviding;
use crate::connector::{AniListConnector, VIEWER_ID_KEY};
use crate::error::AniListResult;
use crate::queries::{EmptyVariables, ViewerQuery};
use crate::types::Viewer;

/// Store key of the synonyms-in-titles preference.
pub const SYNONYMS_KEY: &str = "setting-synonyms-in-titles";

/// Whether list and detail titles should show a synonym.
pub fn synonyms_enabled(store: &dyn SessionStore) -> bool {
    store.get(SYNONYMS_KEY).as_deref() == Some("true")
}

/// Cache the viewer fields other features read without a request.
fn cache_viewer(store: &dyn SessionStore, viewer: &Viewer) -> AniListResult<()> {
    let list = &viewer.media_list_options.manga_list;
    store.set(VIEWER_ID_KEY, Some(viewer.id.to_string()));
    store.set(
        "viewer-advanced-scoring",
        Some(serde_json::to_string(&list.advanced_scoring)?),
    );
    store.set(
        "viewer-list-order",
        Some(serde_json::to_string(&list.section_order)?),
    );
    store.set(
        "viewer-custom-lists",
        Some(serde_json::to_string(&list.custom_lists)?),
    );
    store.set(
        "viewer-split-completed-list-by-format",
        Some(list.split_completed_section_by_format.to_string()),
    );
    store.set(
        "viewer-advanced-scoring-enabled",
        Some(list.advanced_scoring_enabled.to_string()),
    );
    Ok(())
}

#[async_trait]
impl SettingsProviding for AniListConnector {
    #[instrument(skip_all)]
    async fn login(&self, access_token: &str) -> AniListResult<Viewer> {
        let token = BearerToken::new(access_token.trim());
        let claims = TokenInspector::inspect(token.as_str(), self.client().clock().now())?;
        Session::store_token(self.store(), &token);

        let viewer = match self.viewer_profile().await {
            Ok(viewer) => viewer,
            Err(err) => {
                warn!(error = %err, "viewer lookup failed; discarding session");
                Session::clear(self.store());
                return Err(err);
            }
        };

        if let Err(err) = cache_viewer(self.store(), &viewer) {
            Session::clear(self.store());
            return Err(err);
        }
        info!(viewer = viewer.id, subject = %claims.subject, "logged in");
        Ok(viewer)
    }

    fn logout(&self) {
        Session::clear(self.store());
        info!("logged out");
    }

    async fn viewer_profile(&self) -> AniListResult<Viewer> {
        let data = self
            .client()
            .execute::<ViewerQuery>(&EmptyVariables {})
            .await?;
        Ok(data.viewer)
    }

    fn session_claims(&self) -> AniListResult<Claims> {
        let token = Session::read_token(self.store())?;
        Ok(TokenInspector::inspect(
            token.as_str(),
            self.client().clock().now(),
        )?)
    }

    fn show_synonyms(&self) -> bool {
        synonyms_enabled(self.store())
    }

    fn set_show_synonyms(&self, enabled: bool) {
        self.store().set(SYNONYMS_KEY, Some(enabled.to_string()));
    }

    fn login_url(&self) -> AniListResult<String> {
        let grant = ImplicitGrant::new(
            self.config().client_id.clone(),
            self.config().authorize_url.clone(),
        );
        Ok(grant.authorization_url()?)
    }
}
