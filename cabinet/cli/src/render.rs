//! Text Rendering
//!
//! Pure functions from a [`StoreView`] to the text printed on stdout. No
//! business state lives here: everything shown is read from the view.

use cabinet_core::{
    recommended_first, ActionKind, ActionOutcome, BusyToken, ColorScheme, IgnoreReason, Phase,
    Preset, Profile, ProtocolDescriptor, StoreView,
};

use crate::theme::Theme;

const TITLE: &str = "VPN Cabinet";
const SUBTITLE: &str = "Your VPN account at a glance";

/// Render the whole cabinet for the given color scheme
pub fn render(view: &StoreView, scheme: ColorScheme) -> String {
    render_with(view, &Theme::for_scheme(scheme))
}

/// Render the whole cabinet with an explicit theme
pub fn render_with(view: &StoreView, theme: &Theme) -> String {
    let mut lines = Vec::new();

    match view.phase {
        Phase::Uninitialized | Phase::Loading => lines.push(theme.muted("Loading...")),
        Phase::Failed => {
            // Only the load error; nothing else is trustworthy
            let message = view.error.as_ref().map_or_else(
                || ActionKind::Load.failure_message().to_string(),
                ToString::to_string,
            );
            lines.push(theme.error(&format!("✖ {message}")));
        }
        Phase::Ready => render_ready(view, theme, &mut lines),
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn render_ready(view: &StoreView, theme: &Theme, lines: &mut Vec<String>) {
    lines.push(theme.accent(TITLE));
    lines.push(theme.muted(SUBTITLE));

    if let Some(ref error) = view.error {
        lines.push(String::new());
        lines.push(theme.error(&format!("✖ {error}")));
    }
    if let Some(ref info) = view.info {
        lines.push(String::new());
        lines.push(theme.info(&format!("✔ {info}")));
    }

    let Some(ref session) = view.session else {
        return;
    };

    lines.push(String::new());
    lines.push(format!("Hi, {}", session.user.full_name));
    if let Some(ref username) = session.user.username {
        lines.push(theme.muted(&format!("@{username}")));
    }

    lines.push(String::new());
    lines.push(theme.accent("Current VPN"));
    let profile = &session.profile;
    if profile.has_profile {
        render_profile(profile, &view.protocols, view.busy, theme, lines);
    } else {
        lines.push(theme.muted("  You have no active VPN profile yet."));
        lines.push(theme.muted("  Get access through the bot and come back."));
    }

    lines.push(String::new());
    lines.push(theme.accent("Presets"));
    if !profile.has_profile {
        lines.push(theme.muted("  Get a VPN profile first to create presets."));
    } else if session.presets.is_empty() {
        lines.push(theme.muted("  No presets yet."));
    } else {
        for preset in &session.presets {
            let mut line = preset_line(preset);
            if view.busy == BusyToken::Open(preset.id) {
                line.push_str(&theme.muted("  opening..."));
            } else if view.busy == BusyToken::Delete(preset.id) {
                line.push_str(&theme.muted("  deleting..."));
            }
            lines.push(line);
        }
    }
    if view.busy == BusyToken::CreatePreset {
        lines.push(theme.muted("  Creating preset..."));
    }

    if let Some(ref preview) = view.preview {
        lines.push(String::new());
        lines.push(theme.accent(&format!("Preset config: {}", preview.name)));
        lines.push(format!("  {}", preview.config.value));
    }
}

fn render_profile(
    profile: &Profile,
    protocols: &[ProtocolDescriptor],
    busy: BusyToken,
    theme: &Theme,
    lines: &mut Vec<String>,
) {
    let protocol = profile
        .protocol
        .as_deref()
        .map_or_else(|| "-".to_string(), str::to_uppercase);
    lines.push(format!("  Protocol  {protocol}"));
    if let Some(ref label) = profile.label {
        lines.push(format!("  Label     {label}"));
    }

    lines.push(String::new());
    lines.push("  Switch protocol".to_string());
    lines.extend(protocol_chips(profile, protocols, busy, theme));
    if busy == BusyToken::Protocol {
        lines.push(theme.muted("    switching..."));
    }

    lines.push(String::new());
    lines.push("  Choose SNI".to_string());
    if profile.available_snis.is_empty() {
        lines.push(theme.muted("    SNI is not configurable for this protocol."));
    } else {
        for sni in &profile.available_snis {
            let state = ChipState::of(profile.is_active_sni(sni), busy);
            lines.push(chip(sni, state, false, theme));
        }
    }
    if busy == BusyToken::Sni {
        lines.push(theme.muted("    updating..."));
    }
}

fn protocol_chips(
    profile: &Profile,
    protocols: &[ProtocolDescriptor],
    busy: BusyToken,
    theme: &Theme,
) -> Vec<String> {
    if protocols.is_empty() {
        return vec![theme.muted("    No protocols configured yet.")];
    }
    recommended_first(protocols)
        .into_iter()
        .map(|p| {
            let state = ChipState::of(profile.is_active_protocol(&p.name), busy);
            chip(&p.display_label(), state, p.recommended, theme)
        })
        .collect()
}

/// How a selectable chip is drawn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ChipState {
    /// The current value
    Active,
    /// Can be selected
    Available,
    /// Another action is in flight; nothing can be selected
    Disabled,
}

impl ChipState {
    fn of(active: bool, busy: BusyToken) -> Self {
        if active {
            Self::Active
        } else if busy.is_idle() {
            Self::Available
        } else {
            Self::Disabled
        }
    }
}

fn chip(label: &str, state: ChipState, recommended: bool, theme: &Theme) -> String {
    let mut line = match state {
        ChipState::Active => format!("    [x] {}", theme.accent(label)),
        ChipState::Available => format!("    [ ] {label}"),
        ChipState::Disabled => theme.muted(&format!("    [-] {label}")),
    };
    if recommended {
        line.push_str(&theme.muted(" (recommended)"));
    }
    line
}

fn preset_line(preset: &Preset) -> String {
    let id = format!("#{}", preset.id);
    format!(
        "  {id:<5} {}  {} · {}",
        preset.name, preset.app_type, preset.format
    )
}

/// Render the protocol catalog on its own
pub fn render_protocols(view: &StoreView, theme: &Theme) -> String {
    let profile = view.profile();
    let mut lines = vec![theme.accent("Protocols")];
    if view.protocols.is_empty() {
        lines.push(theme.muted("  No protocols configured yet."));
    }
    for p in recommended_first(&view.protocols) {
        let mut line = format!("  {:<12} {}", p.display_label(), p.name);
        if p.recommended {
            line.push_str("  recommended");
        }
        if profile.is_some_and(|profile| profile.is_active_protocol(&p.name)) {
            line.push_str(&theme.accent("  active"));
        }
        lines.push(line);
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Render a preset list fetched directly from the backend
pub fn render_preset_list(presets: &[Preset], theme: &Theme) -> String {
    let mut lines = vec![theme.accent("Presets")];
    if presets.is_empty() {
        lines.push(theme.muted("  No presets yet."));
    }
    lines.extend(presets.iter().map(preset_line));
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// One-line note for outcomes the view does not explain by itself
///
/// Failures are not described here: the error banner in the view already
/// carries the message.
pub fn describe_outcome(outcome: &ActionOutcome) -> Option<String> {
    match outcome {
        ActionOutcome::Applied | ActionOutcome::Failed(_) => None,
        ActionOutcome::Busy(token) => Some(format!("Another action is in progress ({token}).")),
        ActionOutcome::Ignored(reason) => Some(ignore_message(*reason).to_string()),
    }
}

fn ignore_message(reason: IgnoreReason) -> &'static str {
    match reason {
        IgnoreReason::NotReady => "The cabinet is not ready.",
        IgnoreReason::AlreadyLoaded => "The cabinet is already loaded.",
        IgnoreReason::NoProfile => "Get a VPN profile first.",
        IgnoreReason::AlreadyActive => "Already active, nothing to change.",
        IgnoreReason::EmptyName => "Preset name must not be empty.",
        IgnoreReason::UnknownPreset => "No such preset.",
        IgnoreReason::NothingToCopy => "Open a preset first.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cabinet_core::{
        AppType, PresetConfig, PresetFormat, PresetId, PresetOptions, PresetPreview, Session,
        StoreError, User,
    };
    use pretty_assertions::assert_eq;

    fn ready_view() -> StoreView {
        StoreView {
            phase: Phase::Ready,
            session: Some(Session {
                user: User {
                    full_name: "Anna Petrova".to_string(),
                    username: Some("anna".to_string()),
                },
                profile: Profile {
                    has_profile: true,
                    protocol: Some("vmess".to_string()),
                    label: Some("main".to_string()),
                    sni: Some("a.example".to_string()),
                    available_snis: vec!["a.example".to_string(), "b.example".to_string()],
                },
                presets: vec![Preset {
                    id: PresetId(3),
                    name: "Phone".to_string(),
                    app_type: AppType::V2ray,
                    format: PresetFormat::VlessUri,
                    options: PresetOptions::new(),
                }],
            }),
            protocols: vec![
                ProtocolDescriptor {
                    name: "vmess".to_string(),
                    label: None,
                    recommended: false,
                },
                ProtocolDescriptor {
                    name: "vless".to_string(),
                    label: Some("VLESS Reality".to_string()),
                    recommended: true,
                },
            ],
            ..StoreView::default()
        }
    }

    #[test]
    fn test_render_ready_view() {
        let text = render_with(&ready_view(), &Theme::plain());
        let expected = "\
VPN Cabinet
Your VPN account at a glance

Hi, Anna Petrova
@anna

Current VPN
  Protocol  VMESS
  Label     main

  Switch protocol
    [ ] VLESS Reality (recommended)
    [x] VMESS

  Choose SNI
    [x] a.example
    [ ] b.example

Presets
  #3    Phone  v2ray · vless_uri
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_loading() {
        let view = StoreView::default();
        assert_eq!(render_with(&view, &Theme::plain()), "Loading...\n");
    }

    #[test]
    fn test_render_failed_shows_only_load_error() {
        let view = StoreView {
            phase: Phase::Failed,
            error: Some(StoreError::load()),
            ..StoreView::default()
        };
        assert_eq!(
            render_with(&view, &Theme::plain()),
            "✖ Could not load data. Try reopening the app.\n"
        );
    }

    #[test]
    fn test_render_banners_and_preview() {
        let mut view = ready_view();
        view.info = Some("Preset deleted.".to_string());
        view.error = Some(StoreError::action(ActionKind::UpdateSni));
        view.preview = Some(PresetPreview {
            id: PresetId(3),
            name: "Phone".to_string(),
            config: PresetConfig {
                value: "vless://uuid@vpn.example:443".to_string(),
            },
        });

        let text = render_with(&view, &Theme::plain());

        assert!(text.contains("✖ Could not update SNI.\n"));
        assert!(text.contains("✔ Preset deleted.\n"));
        assert!(text.ends_with("Preset config: Phone\n  vless://uuid@vpn.example:443\n"));
    }

    #[test]
    fn test_render_without_profile() {
        let mut view = ready_view();
        if let Some(ref mut session) = view.session {
            session.profile = Profile::default();
            session.presets.clear();
            session.user.username = None;
        }

        let text = render_with(&view, &Theme::plain());

        assert!(!text.contains('@'));
        assert!(text.contains("You have no active VPN profile yet."));
        assert!(text.contains("Get a VPN profile first to create presets."));
        assert!(!text.contains("Switch protocol"));
    }

    #[test]
    fn test_render_empty_lists_and_busy_markers() {
        let mut view = ready_view();
        view.protocols.clear();
        view.busy = BusyToken::Sni;
        if let Some(ref mut session) = view.session {
            session.profile.available_snis.clear();
            session.presets.clear();
        }

        let text = render_with(&view, &Theme::plain());

        assert!(text.contains("No protocols configured yet."));
        assert!(text.contains("SNI is not configurable for this protocol."));
        assert!(text.contains("updating..."));
        assert!(text.contains("No presets yet."));
    }

    #[test]
    fn test_render_marks_preset_in_flight() {
        let mut view = ready_view();
        view.busy = BusyToken::Delete(PresetId(3));
        let text = render_with(&view, &Theme::plain());
        assert!(text.contains("Phone  v2ray · vless_uri  deleting..."));
    }

    #[test]
    fn test_render_uses_scheme_palette() {
        use crossterm::style::Stylize;

        let view = StoreView::default();
        assert_eq!(
            render(&view, ColorScheme::Dark),
            format!("{}\n", "Loading...".with(crate::theme::DARK_MUTED))
        );
        assert_eq!(
            render(&view, ColorScheme::Light),
            format!("{}\n", "Loading...".with(crate::theme::LIGHT_MUTED))
        );
    }

    #[test]
    fn test_render_disables_chips_while_busy() {
        let mut view = ready_view();
        view.busy = BusyToken::Open(PresetId(3));

        let text = render_with(&view, &Theme::plain());

        assert!(text.contains("    [-] VLESS Reality (recommended)\n"));
        assert!(text.contains("    [x] VMESS\n"));
        assert!(text.contains("    [x] a.example\n"));
        assert!(text.contains("    [-] b.example\n"));
        assert!(text.contains("Phone  v2ray · vless_uri  opening..."));
    }

    #[test]
    fn test_render_protocols() {
        let text = render_protocols(&ready_view(), &Theme::plain());
        assert_eq!(
            text,
            "Protocols\n  VLESS Reality vless  recommended\n  VMESS        vmess  active\n"
        );
    }

    #[test]
    fn test_render_preset_list() {
        assert_eq!(
            render_preset_list(&[], &Theme::plain()),
            "Presets\n  No presets yet.\n"
        );
    }

    #[test]
    fn test_describe_outcome() {
        assert_eq!(describe_outcome(&ActionOutcome::Applied), None);
        assert_eq!(
            describe_outcome(&ActionOutcome::Failed(StoreError::clipboard())),
            None
        );
        assert_eq!(
            describe_outcome(&ActionOutcome::Busy(BusyToken::Protocol)).as_deref(),
            Some("Another action is in progress (protocol).")
        );
        assert_eq!(
            describe_outcome(&ActionOutcome::Ignored(IgnoreReason::AlreadyActive)).as_deref(),
            Some("Already active, nothing to change.")
        );
    }
}
