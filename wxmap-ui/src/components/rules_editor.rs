//! Editor for the classification rules of the selected data source.

use crate::state::AppState;
use dioxus::prelude::*;
use log::warn;
use wxmap_core::classify::{find_source, ClassificationRule, DataSeries};

#[derive(Clone, Copy, PartialEq)]
enum RuleKind {
    LessThan,
    AtLeast,
    Range,
}

impl RuleKind {
    fn of(rule: &ClassificationRule) -> Self {
        match rule {
            ClassificationRule::LessThan { .. } => Self::LessThan,
            ClassificationRule::AtLeast { .. } => Self::AtLeast,
            ClassificationRule::Range { .. } => Self::Range,
        }
    }

    fn value(&self) -> &'static str {
        match self {
            Self::LessThan => "lt",
            Self::AtLeast => "gte",
            Self::Range => "range",
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Self::LessThan => "<",
            Self::AtLeast => "≥",
            Self::Range => "range",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "lt" => Some(Self::LessThan),
            "gte" => Some(Self::AtLeast),
            "range" => Some(Self::Range),
            _ => None,
        }
    }
}

/// Pieces of a rule as the editor shows them.
fn parts(rule: &ClassificationRule) -> (f64, Option<f64>, String) {
    match rule {
        ClassificationRule::LessThan { threshold, color }
        | ClassificationRule::AtLeast { threshold, color } => (*threshold, None, color.clone()),
        ClassificationRule::Range { low, high, color } => (*low, Some(*high), color.clone()),
    }
}

fn build(kind: RuleKind, threshold: f64, high: f64, color: String) -> ClassificationRule {
    match kind {
        RuleKind::LessThan => ClassificationRule::LessThan { threshold, color },
        RuleKind::AtLeast => ClassificationRule::AtLeast { threshold, color },
        RuleKind::Range => ClassificationRule::Range {
            low: threshold,
            high,
            color,
        },
    }
}

/// Apply `edit` to the selected source, logging a refused edit.
fn edit_selected(
    state: AppState,
    edit: impl FnOnce(&mut DataSeries) -> wxmap_core::Result<()>,
) {
    let mut sources = state.sources;
    let id = state.selected_source.peek().clone();
    let mut sources = sources.write();
    if let Some(source) = sources.iter_mut().find(|s| s.id == id) {
        if let Err(e) = edit(source) {
            warn!("rule edit on {} refused: {}", id, e);
        }
    }
}

#[component]
pub fn RulesEditor() -> Element {
    let state = use_context::<AppState>();
    let source_id = (state.selected_source)();
    let Some(source) = find_source(&state.sources.read(), &source_id).cloned() else {
        return rsx! {};
    };

    let update = move |index: usize, rule: ClassificationRule| {
        edit_selected(state, |s| s.update_rule(index, rule));
    };

    let rows = source.rules.iter().cloned().enumerate().map(move |(i, rule)| {
        let kind = RuleKind::of(&rule);
        let (threshold, high, color) = parts(&rule);
        let high_or_default = high.unwrap_or(threshold + 10.0);
        let (c1, c2, c3) = (color.clone(), color.clone(), color.clone());

        rsx! {
            div {
                key: "{i}",
                style: "display: flex; gap: 4px; align-items: center; margin: 4px 0;",
                select {
                    onchange: move |evt: Event<FormData>| {
                        if let Some(kind) = RuleKind::parse(&evt.value()) {
                            update(i, build(kind, threshold, high_or_default, c1.clone()));
                        }
                    },
                    for k in [RuleKind::LessThan, RuleKind::AtLeast, RuleKind::Range] {
                        option {
                            value: k.value(),
                            selected: k == kind,
                            {k.symbol()}
                        }
                    }
                }
                input {
                    r#type: "number",
                    style: "width: 64px;",
                    value: "{threshold}",
                    onchange: move |evt: Event<FormData>| {
                        if let Ok(v) = evt.value().parse::<f64>() {
                            update(i, build(kind, v, high_or_default, c2.clone()));
                        }
                    },
                }
                if let Some(high) = high {
                    input {
                        r#type: "number",
                        style: "width: 64px;",
                        value: "{high}",
                        onchange: move |evt: Event<FormData>| {
                            if let Ok(v) = evt.value().parse::<f64>() {
                                update(i, build(kind, threshold, v, c3.clone()));
                            }
                        },
                    }
                }
                input {
                    r#type: "color",
                    value: "{color}",
                    onchange: move |evt: Event<FormData>| {
                        update(i, build(kind, threshold, high_or_default, evt.value()));
                    },
                }
                button {
                    onclick: move |_| edit_selected(state, |s| s.remove_rule(i).map(|_| ())),
                    "✕"
                }
            }
        }
    });

    rsx! {
        div {
            style: "margin: 8px 0;",
            div {
                style: "display: flex; justify-content: space-between; align-items: center;",
                strong { "{source.display_name} Rules" }
                button {
                    onclick: move |_| {
                        edit_selected(state, |s| {
                            s.add_rule();
                            Ok(())
                        })
                    },
                    "+ Add Rule"
                }
            }
            {rows}
            div {
                style: "font-size: 12px; color: #6b7280; margin-top: 4px;",
                "Unmatched: "
                span {
                    style: "display: inline-block; width: 10px; height: 10px; background: {source.base_color};",
                }
            }
        }
    }
}
