//! Session Store
//!
//! The single owner of the client-side snapshot. Surfaces call the store's
//! operations and render whatever [`StoreView`] it publishes; they never hold
//! business state of their own.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized ──load()──▶ Loading ──both fetches ok──▶ Ready ◀──▶ Busy(action)
//!                                  └──either failed────▶ Failed (terminal)
//! ```
//!
//! # Actions
//!
//! Every user action goes through the same gate:
//!
//! 1. ignored unless the store is `Ready`
//! 2. rejected while another action holds the busy token
//! 3. ignored when it would not change anything (already active, empty name, ...)
//! 4. error and info banners cleared, busy token claimed
//! 5. one backend call
//! 6. writes refetch `/me` and replace the session wholesale; the session is
//!    never patched locally
//! 7. failures leave the session untouched and set the action's banner
//! 8. the busy token is released on every exit path
//!
//! A write followed by a failed refetch is reported as a failure even though
//! the backend applied the write. The two calls are not transactional.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::api::{ApiResult, CabinetApi};
use crate::busy::{BusyGuard, BusySlot, BusyToken};
use crate::clipboard::Clipboard;
use crate::error::{ActionKind, StoreError};
use crate::model::{
    NewPreset, Preset, PresetConfig, PresetId, Profile, ProtocolDescriptor, Session,
};

/// Lifecycle phase of the store
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// `load()` has not been called
    #[default]
    Uninitialized,
    /// Initial fetches in flight
    Loading,
    /// Session available, actions accepted
    Ready,
    /// Initial load failed; no recovery without a restart
    Failed,
}

/// The preset config currently shown to the user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetPreview {
    /// Preset the config belongs to
    pub id: PresetId,
    /// Preset name at the time it was opened
    pub name: String,
    /// The fetched config
    pub config: PresetConfig,
}

/// Everything a surface needs to render, published after every change
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreView {
    /// Lifecycle phase
    pub phase: Phase,
    /// Latest `/me` snapshot
    pub session: Option<Session>,
    /// Protocol catalog
    pub protocols: Vec<ProtocolDescriptor>,
    /// Action currently in flight
    pub busy: BusyToken,
    /// Error banner
    pub error: Option<StoreError>,
    /// Info banner
    pub info: Option<String>,
    /// Preset config preview
    pub preview: Option<PresetPreview>,
}

impl StoreView {
    /// Whether any action is in flight
    #[must_use]
    pub fn is_busy(&self) -> bool {
        !self.busy.is_idle()
    }

    /// The active profile, if loaded
    #[must_use]
    pub fn profile(&self) -> Option<&Profile> {
        self.session.as_ref().map(|s| &s.profile)
    }

    /// Presets of the loaded session (empty before load)
    #[must_use]
    pub fn presets(&self) -> &[Preset] {
        self.session.as_ref().map_or(&[], |s| s.presets.as_slice())
    }
}

/// Why an action was not dispatched
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IgnoreReason {
    /// The store is not `Ready`
    NotReady,
    /// `load()` was already called
    AlreadyLoaded,
    /// The user has no active VPN profile
    NoProfile,
    /// The requested protocol or SNI is already active
    AlreadyActive,
    /// The preset name is empty after trimming
    EmptyName,
    /// No preset with that id in the session
    UnknownPreset,
    /// No preview to copy
    NothingToCopy,
}

/// Result of calling a store operation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action ran and the view reflects its result
    Applied,
    /// The action ran and failed; the error is also in the view's banner
    Failed(StoreError),
    /// Another action holds the busy token; nothing was sent
    Busy(BusyToken),
    /// Nothing to do; nothing was sent
    Ignored(IgnoreReason),
}

impl ActionOutcome {
    /// Whether the action ran successfully
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    /// Whether the action ran and failed
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Mutable store state, guarded by the store mutex
struct StoreState {
    view: StoreView,
    tx: watch::Sender<StoreView>,
}

impl StoreState {
    /// Push the current view to subscribers
    fn publish(&self) {
        self.tx.send_replace(self.view.clone());
    }

    /// Record a failure banner and publish
    fn fail(&mut self, error: StoreError) -> ActionOutcome {
        self.view.error = Some(error.clone());
        self.publish();
        ActionOutcome::Failed(error)
    }
}

impl BusySlot for StoreState {
    fn token_mut(&mut self) -> &mut BusyToken {
        &mut self.view.busy
    }

    fn on_change(&mut self) {
        self.publish();
    }
}

/// Authoritative client-side session state
///
/// All operations take `&self` and may be called from concurrent futures;
/// the busy token guarantees only one action is in flight.
pub struct SessionStore<A: CabinetApi> {
    /// Backend access
    api: Arc<A>,
    /// Snapshot, banners, busy token; never locked across an `.await`
    state: Mutex<StoreState>,
}

impl<A: CabinetApi> SessionStore<A> {
    /// Create an uninitialized store over the given API
    pub fn new(api: A) -> Self {
        let view = StoreView::default();
        let (tx, _rx) = watch::channel(view.clone());
        Self {
            api: Arc::new(api),
            state: Mutex::new(StoreState { view, tx }),
        }
    }

    /// The underlying API
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Current view
    pub fn view(&self) -> StoreView {
        self.state.lock().view.clone()
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.state.lock().view.phase
    }

    /// Current busy token
    pub fn busy(&self) -> BusyToken {
        self.state.lock().view.busy
    }

    /// Receive every published view, starting with the current one
    pub fn subscribe(&self) -> watch::Receiver<StoreView> {
        self.state.lock().tx.subscribe()
    }

    /// Clear the error banner
    pub fn dismiss_error(&self) {
        let mut state = self.state.lock();
        if state.view.error.take().is_some() {
            state.publish();
        }
    }

    /// Initial load: fetch `/me` and `/protocols` concurrently
    ///
    /// Both must succeed for the store to become `Ready`; otherwise it ends
    /// `Failed` with no partial data.
    pub async fn load(&self) -> ActionOutcome {
        {
            let mut state = self.state.lock();
            if state.view.phase != Phase::Uninitialized {
                return ActionOutcome::Ignored(IgnoreReason::AlreadyLoaded);
            }
            state.view.phase = Phase::Loading;
            state.publish();
        }

        let (me, protocols) = tokio::join!(self.api.fetch_me(), self.api.fetch_protocols());

        let mut state = self.state.lock();
        match (me, protocols) {
            (Ok(session), Ok(protocols)) => {
                tracing::info!(
                    has_profile = session.profile.has_profile,
                    presets = session.presets.len(),
                    protocols = protocols.len(),
                    "Cabinet session loaded"
                );
                state.view.session = Some(session);
                state.view.protocols = protocols;
                state.view.phase = Phase::Ready;
                state.publish();
                ActionOutcome::Applied
            }
            (me, protocols) => {
                if let Err(e) = me {
                    tracing::warn!(error = %e, "Failed to fetch /me");
                }
                if let Err(e) = protocols {
                    tracing::warn!(error = %e, "Failed to fetch /protocols");
                }
                state.view.phase = Phase::Failed;
                state.fail(StoreError::load())
            }
        }
    }

    /// Switch the active VPN protocol
    pub async fn switch_protocol(&self, protocol: &str) -> ActionOutcome {
        let guard = match self.begin(BusyToken::Protocol, |view| {
            let profile = active_profile(view)?;
            if profile.is_active_protocol(protocol) {
                return Err(IgnoreReason::AlreadyActive);
            }
            Ok(())
        }) {
            Ok((guard, ())) => guard,
            Err(outcome) => return outcome,
        };

        tracing::info!(protocol = protocol, "Switching protocol");
        let result = self.api.switch_protocol(protocol).await;
        let outcome = self.finish_write(ActionKind::SwitchProtocol, result).await;
        drop(guard);
        outcome
    }

    /// Change the SNI of the active profile
    pub async fn update_sni(&self, sni: &str) -> ActionOutcome {
        let guard = match self.begin(BusyToken::Sni, |view| {
            let profile = active_profile(view)?;
            if profile.is_active_sni(sni) {
                return Err(IgnoreReason::AlreadyActive);
            }
            Ok(())
        }) {
            Ok((guard, ())) => guard,
            Err(outcome) => return outcome,
        };

        tracing::info!(sni = sni, "Updating SNI");
        let result = self.api.update_sni(sni).await;
        let outcome = self.finish_write(ActionKind::UpdateSni, result).await;
        drop(guard);
        outcome
    }

    /// Create a preset from a draft; the name is trimmed first
    pub async fn create_preset(&self, draft: &NewPreset) -> ActionOutcome {
        let (guard, preset) = match self.begin(BusyToken::CreatePreset, |view| {
            active_profile(view)?;
            draft.normalized().ok_or(IgnoreReason::EmptyName)
        }) {
            Ok(claimed) => claimed,
            Err(outcome) => return outcome,
        };

        tracing::info!(name = %preset.name, app_type = %preset.app_type, "Creating preset");
        let result = self.api.create_preset(&preset).await.map(|created| {
            tracing::debug!(id = %created.id, "Preset created");
        });
        let outcome = self.finish_write(ActionKind::CreatePreset, result).await;
        drop(guard);
        outcome
    }

    /// Delete a preset; clears the preview if it shows that preset
    pub async fn delete_preset(&self, id: PresetId) -> ActionOutcome {
        let guard = match self.begin(BusyToken::Delete(id), |_| Ok(())) {
            Ok((guard, ())) => guard,
            Err(outcome) => return outcome,
        };

        tracing::info!(id = %id, "Deleting preset");
        let result = self.api.delete_preset(id).await;
        if result.is_ok() {
            let mut state = self.state.lock();
            if state.view.preview.as_ref().is_some_and(|p| p.id == id) {
                state.view.preview = None;
                state.publish();
            }
        }
        let outcome = self.finish_write(ActionKind::DeletePreset, result).await;
        drop(guard);
        outcome
    }

    /// Fetch a preset's config into the preview slot
    ///
    /// A pure read: the session is not refetched.
    pub async fn open_preset(&self, id: PresetId) -> ActionOutcome {
        let (guard, name) = match self.begin(BusyToken::Open(id), |view| {
            view.session
                .as_ref()
                .and_then(|s| s.preset(id))
                .map(|p| p.name.clone())
                .ok_or(IgnoreReason::UnknownPreset)
        }) {
            Ok(claimed) => claimed,
            Err(outcome) => return outcome,
        };

        tracing::debug!(id = %id, token = %guard.token(), "Fetching preset config");
        let result = self.api.get_preset_config(id).await;

        let outcome = {
            let mut state = self.state.lock();
            match result {
                Ok(config) => {
                    state.view.preview = Some(PresetPreview { id, name, config });
                    state.publish();
                    ActionOutcome::Applied
                }
                Err(e) => {
                    tracing::warn!(id = %id, error = %e, "Failed to fetch preset config");
                    state.fail(StoreError::action(ActionKind::OpenPreset))
                }
            }
        };
        drop(guard);
        outcome
    }

    /// Copy the preview value to a clipboard
    ///
    /// Best-effort and not gated by the busy token.
    pub async fn copy_preview(&self, clipboard: &dyn Clipboard) -> ActionOutcome {
        let value = {
            let state = self.state.lock();
            match state.view.preview {
                Some(ref preview) => preview.config.value.clone(),
                None => return ActionOutcome::Ignored(IgnoreReason::NothingToCopy),
            }
        };

        let result = clipboard.write_text(&value);

        let mut state = self.state.lock();
        match result {
            Ok(()) => {
                state.view.info = ActionKind::CopyPreview.success_message().map(String::from);
                state.publish();
                ActionOutcome::Applied
            }
            Err(e) => {
                tracing::warn!(error = %e, "Clipboard write failed");
                state.fail(StoreError::clipboard())
            }
        }
    }

    /// Gate an action: readiness, busy token, precondition, then claim
    ///
    /// On success the banners are cleared and the token is held by the
    /// returned guard. The precondition runs under the same lock as the claim.
    fn begin<T>(
        &self,
        token: BusyToken,
        precondition: impl FnOnce(&StoreView) -> Result<T, IgnoreReason>,
    ) -> Result<(BusyGuard<'_, StoreState>, T), ActionOutcome> {
        let mut state = self.state.lock();

        if state.view.phase != Phase::Ready {
            return Err(ActionOutcome::Ignored(IgnoreReason::NotReady));
        }
        if !state.view.busy.is_idle() {
            tracing::debug!(requested = %token, busy = %state.view.busy, "Action rejected while busy");
            return Err(ActionOutcome::Busy(state.view.busy));
        }
        let value = precondition(&state.view).map_err(ActionOutcome::Ignored)?;

        state.view.error = None;
        state.view.info = None;
        let guard = BusyGuard::claim(&self.state, &mut *state, token).map_err(ActionOutcome::Busy)?;
        Ok((guard, value))
    }

    /// Complete a write: refetch `/me` on success, set the banner either way
    async fn finish_write(&self, action: ActionKind, result: ApiResult<()>) -> ActionOutcome {
        if let Err(e) = result {
            tracing::warn!(action = %action, error = %e, "Action failed");
            return self.state.lock().fail(StoreError::action(action));
        }

        let refreshed = self.api.fetch_me().await;

        let mut state = self.state.lock();
        match refreshed {
            Ok(session) => {
                state.view.session = Some(session);
                state.view.info = action.success_message().map(String::from);
                state.publish();
                ActionOutcome::Applied
            }
            Err(e) => {
                tracing::warn!(action = %action, error = %e, "Write applied but refetch of /me failed");
                state.fail(StoreError::refresh_failed(action))
            }
        }
    }
}

/// The profile, if the user has one
fn active_profile(view: &StoreView) -> Result<&Profile, IgnoreReason> {
    view.profile()
        .filter(|p| p.has_profile)
        .ok_or(IgnoreReason::NoProfile)
}
