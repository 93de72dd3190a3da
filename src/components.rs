//! Yew view components for the picker screens.
//!
//! Most of these are stateless and render from props. `Avatar` keeps one
//! bit of state: whether its image failed to load.

use crate::config::{BADGE_COLOR, EMPTY_ROSTER_MESSAGE, PRESELECT_PLACEHOLDER};
use crate::utils::{item_style, item_transition, parse_participant_id, select_value};
use spin_picker::animation::{AnimationStyle, ItemState, Phase};
use spin_picker::{Participant, ParticipantId, SelectionMode};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct AvatarProps {
    pub participant: Participant,
    #[prop_or(AttrValue::Static("avatar"))]
    pub class: AttrValue,
}

/// Participant photo, or a monogram badge when there is no photo or it
/// fails to load.
#[function_component(Avatar)]
pub fn avatar(props: &AvatarProps) -> Html {
    let failed = use_state_eq(|| false);

    // A new URL gets a fresh attempt.
    {
        let failed = failed.clone();
        use_effect_with(props.participant.image_url.clone(), move |_| {
            failed.set(false);
        });
    }

    match &props.participant.image_url {
        Some(url) if !*failed => {
            let onerror = {
                let failed = failed.clone();
                Callback::from(move |_: Event| failed.set(true))
            };
            html! {
                <img class={props.class.clone()}
                    src={url.clone()}
                    alt={props.participant.name.clone()}
                    {onerror}
                />
            }
        }
        _ => html! {
            <div class={classes!(props.class.to_string(), "monogram")}
                style={format!("background: {};", BADGE_COLOR)}>
                { props.participant.monogram() }
            </div>
        },
    }
}

#[derive(Properties, PartialEq)]
pub struct ParticipantCardProps {
    pub participant: Participant,
    pub on_remove: Callback<ParticipantId>,
}

#[function_component(ParticipantCard)]
pub fn participant_card(props: &ParticipantCardProps) -> Html {
    let onclick = {
        let on_remove = props.on_remove.clone();
        let id = props.participant.id;
        Callback::from(move |_: MouseEvent| on_remove.emit(id))
    };
    html! {
        <div class="participant-card">
            <Avatar participant={props.participant.clone()} />
            <span class="participant-name">{ &props.participant.name }</span>
            <button class="remove-btn" title="Remove" {onclick}>{ "×" }</button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct RosterListProps {
    pub participants: Vec<Participant>,
    pub on_remove: Callback<ParticipantId>,
}

#[function_component(RosterList)]
pub fn roster_list(props: &RosterListProps) -> Html {
    if props.participants.is_empty() {
        return html! {
            <p class="empty-state">{ EMPTY_ROSTER_MESSAGE }</p>
        };
    }
    html! {
        <div class="participants-grid">
            { props.participants.iter().map(|p| html! {
                <ParticipantCard key={p.id.to_string()}
                    participant={p.clone()}
                    on_remove={props.on_remove.clone()} />
            }).collect::<Html>() }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ModeCardProps {
    pub mode: SelectionMode,
    pub selected: bool,
    pub on_select: Callback<SelectionMode>,
}

/// One of the two mutually exclusive mode options.
#[function_component(ModeCard)]
pub fn mode_card(props: &ModeCardProps) -> Html {
    let (title, blurb) = match props.mode {
        SelectionMode::Random => ("Random", "Everyone has the same chance of being picked."),
        SelectionMode::Rigged => ("Preset", "Choose in advance who will be picked."),
    };
    let onclick = {
        let on_select = props.on_select.clone();
        let mode = props.mode;
        Callback::from(move |_: MouseEvent| on_select.emit(mode))
    };
    html! {
        <div class={classes!("mode-card", props.selected.then_some("selected"))} {onclick}>
            <h3>{ title }</h3>
            <p>{ blurb }</p>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct PreselectPickerProps {
    pub participants: Vec<Participant>,
    pub selected: Option<ParticipantId>,
    pub on_change: Callback<Option<ParticipantId>>,
}

/// Dropdown for the rigged mode's target.
#[function_component(PreselectPicker)]
pub fn preselect_picker(props: &PreselectPickerProps) -> Html {
    let onchange = {
        let on_change = props.on_change.clone();
        Callback::from(move |e: Event| on_change.emit(parse_participant_id(&select_value(&e))))
    };
    html! {
        <div class="form-group">
            <label for="preselect">{ "Who should be picked?" }</label>
            <select id="preselect" {onchange}>
                <option value="" selected={props.selected.is_none()}>
                    { PRESELECT_PLACEHOLDER }
                </option>
                { props.participants.iter().map(|p| html! {
                    <option value={p.id.to_string()} selected={props.selected == Some(p.id)}>
                        { &p.name }
                    </option>
                }).collect::<Html>() }
            </select>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct StyleToggleProps {
    pub style: AnimationStyle,
    pub disabled: bool,
    pub on_change: Callback<AnimationStyle>,
}

#[function_component(StyleToggle)]
pub fn style_toggle(props: &StyleToggleProps) -> Html {
    let option = |style: AnimationStyle, label: &'static str| {
        let on_change = props.on_change.clone();
        let onclick = Callback::from(move |_: MouseEvent| on_change.emit(style));
        html! {
            <button class={classes!("style-option", (props.style == style).then_some("active"))}
                disabled={props.disabled}
                {onclick}>
                { label }
            </button>
        }
    };
    html! {
        <div class="style-toggle">
            { option(AnimationStyle::Physics, "Bounce") }
            { option(AnimationStyle::Cycling, "Shuffle") }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct AnimatedItemProps {
    pub participant: Participant,
    pub item: ItemState,
    pub phase: Option<Phase>,
    pub progress: f64,
}

/// One participant card inside the animation area.
#[function_component(AnimatedItem)]
pub fn animated_item(props: &AnimatedItemProps) -> Html {
    let transition = item_transition(props.phase, props.progress, props.item.highlighted);
    html! {
        <div class={classes!("animated-item", props.item.highlighted.then_some("highlighted"))}
            style={item_style(&props.item, &transition)}>
            <Avatar participant={props.participant.clone()} class="item-avatar" />
            <span class="item-name">{ &props.participant.name }</span>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ResultPanelProps {
    pub participant: Participant,
}

#[function_component(ResultPanel)]
pub fn result_panel(props: &ResultPanelProps) -> Html {
    html! {
        <div class="result">
            <h2>{ "And the winner is..." }</h2>
            <Avatar participant={props.participant.clone()} class="result-avatar" />
            <div class="result-name">{ &props.participant.name }</div>
        </div>
    }
}
