//! Play-by-play text selection.
//!
//! The engine only chooses which bucket to query and fills the placeholders;
//! wording lives behind [`PlayTextLibrary`]. The built-in catalog is an
//! embedded JSON asset so the core works without any collaborator wired in.
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::play::{Description, PlayerRef};
use crate::player::{Player, Position};
use crate::possession::{Outcome, ShotType};
use crate::streak::Zone;

const DEFAULT_PLAY_TEXT: &str = include_str!("../assets/play_text.json");
const ANY_POSITION: &str = "any";

/// Output language of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lang {
    En,
    Zh,
}

/// Text bucket queried for one piece of a description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayCategory {
    MadeTwo,
    MadeThree,
    MissedTwo,
    MissedThree,
    Blocked,
    OffensiveRebound,
    FreeThrows,
    Turnover,
    Steal,
    AssistSuffix,
    Substitution,
    ZoneHot,
    ZoneFire,
    ZoneCold,
    ZoneFrozen,
}

impl PlayCategory {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::MadeTwo => "made_two",
            Self::MadeThree => "made_three",
            Self::MissedTwo => "missed_two",
            Self::MissedThree => "missed_three",
            Self::Blocked => "blocked",
            Self::OffensiveRebound => "offensive_rebound",
            Self::FreeThrows => "free_throws",
            Self::Turnover => "turnover",
            Self::Steal => "steal",
            Self::AssistSuffix => "assist_suffix",
            Self::Substitution => "substitution",
            Self::ZoneHot => "zone_hot",
            Self::ZoneFire => "zone_fire",
            Self::ZoneCold => "zone_cold",
            Self::ZoneFrozen => "zone_frozen",
        }
    }

    /// Headline bucket for a possession outcome.
    #[must_use]
    pub const fn for_outcome(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Turnover { steal: true } => Self::Steal,
            Outcome::Turnover { steal: false } => Self::Turnover,
            Outcome::FreeThrows { .. } => Self::FreeThrows,
            Outcome::FieldGoal { block: true, .. } => Self::Blocked,
            Outcome::FieldGoal { shot, made, .. } => match (shot, made) {
                (ShotType::Three, true) => Self::MadeThree,
                (ShotType::Three, false) => Self::MissedThree,
                (_, true) => Self::MadeTwo,
                (_, false) => Self::MissedTwo,
            },
        }
    }

    #[must_use]
    pub const fn for_zone(zone: Zone) -> Option<Self> {
        match zone {
            Zone::Hot => Some(Self::ZoneHot),
            Zone::Fire => Some(Self::ZoneFire),
            Zone::Cold => Some(Self::ZoneCold),
            Zone::Frozen => Some(Self::ZoneFrozen),
            Zone::Neutral => None,
        }
    }
}

/// Collaborator seam supplying play-by-play wording.
pub trait PlayTextLibrary {
    /// Template for a bucket, with `{attacker}`/`{defender}`-style placeholders.
    fn template(
        &self,
        category: PlayCategory,
        position: Option<Position>,
        lang: Lang,
    ) -> Option<Cow<'_, str>>;

    fn short_name(&self, full: &str) -> String {
        short_name(full)
    }
}

/// "LeBron James" -> "L. James"; single names pass through.
#[must_use]
pub fn short_name(full: &str) -> String {
    let mut parts = full.split_whitespace();
    let Some(first) = parts.next() else {
        return String::new();
    };
    let rest: Vec<&str> = parts.collect();
    if rest.is_empty() {
        return first.to_string();
    }
    let initial = first.chars().next().map(String::from).unwrap_or_default();
    format!("{initial}. {}", rest.join(" "))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatePair {
    pub en: String,
    pub zh: String,
}

impl TemplatePair {
    fn get(&self, lang: Lang) -> &str {
        match lang {
            Lang::En => &self.en,
            Lang::Zh => &self.zh,
        }
    }
}

/// Built-in bilingual catalog: category key -> position key (or `any`) -> template pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuiltinPlayText {
    buckets: BTreeMap<String, BTreeMap<String, TemplatePair>>,
}

impl BuiltinPlayText {
    #[must_use]
    pub fn load_from_static() -> Self {
        serde_json::from_str(DEFAULT_PLAY_TEXT).unwrap_or_default()
    }

    #[must_use]
    pub fn default_catalog() -> &'static Self {
        static CATALOG: OnceLock<BuiltinPlayText> = OnceLock::new();
        CATALOG.get_or_init(Self::load_from_static)
    }

    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a template catalog.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl PlayTextLibrary for BuiltinPlayText {
    fn template(
        &self,
        category: PlayCategory,
        position: Option<Position>,
        lang: Lang,
    ) -> Option<Cow<'_, str>> {
        let bucket = self.buckets.get(category.key())?;
        let pair = position
            .and_then(|pos| bucket.get(pos.as_str()))
            .or_else(|| bucket.get(ANY_POSITION))?;
        let text = pair.get(lang);
        (!text.is_empty()).then_some(Cow::Borrowed(text))
    }
}

impl<T: PlayTextLibrary + ?Sized> PlayTextLibrary for &T {
    fn template(
        &self,
        category: PlayCategory,
        position: Option<Position>,
        lang: Lang,
    ) -> Option<Cow<'_, str>> {
        (**self).template(category, position, lang)
    }

    fn short_name(&self, full: &str) -> String {
        (**self).short_name(full)
    }
}

fn fallback(category: PlayCategory, lang: Lang) -> &'static str {
    match (category, lang) {
        (PlayCategory::Substitution, Lang::En) => "{in} checks in for {out}.",
        (PlayCategory::Substitution, Lang::Zh) => "{in} 替换 {out} 上场。",
        (PlayCategory::AssistSuffix | PlayCategory::OffensiveRebound, _)
        | (PlayCategory::ZoneHot | PlayCategory::ZoneFire, _)
        | (PlayCategory::ZoneCold | PlayCategory::ZoneFrozen, _) => "",
        (_, Lang::En) => "{attacker} works against {defender}.",
        (_, Lang::Zh) => "{attacker} 对位 {defender}。",
    }
}

fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in values {
        out = out.replace(&format!("{{{key}}}"), value);
    }
    out
}

fn line<T: PlayTextLibrary + ?Sized>(
    library: &T,
    category: PlayCategory,
    position: Option<Position>,
    lang: Lang,
    values: &[(&str, &str)],
) -> String {
    let template = library
        .template(category, position, lang)
        .unwrap_or(Cow::Borrowed(fallback(category, lang)));
    fill(&template, values)
}

fn join(parts: &[String], lang: Lang) -> String {
    let separator = match lang {
        Lang::En => " ",
        Lang::Zh => "",
    };
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(separator)
}

/// Inputs for one possession description.
#[derive(Debug, Clone, Copy)]
pub struct PossessionText<'a> {
    pub attacker: &'a Player,
    pub defender: &'a Player,
    pub assister: Option<&'a Player>,
    pub outcome: &'a Outcome,
    pub zone_entered: Option<Zone>,
}

/// Assemble the bilingual description of a possession.
#[must_use]
pub fn describe_possession<T: PlayTextLibrary + ?Sized>(
    library: &T,
    text: &PossessionText<'_>,
) -> Description {
    let attacker = library.short_name(&text.attacker.name);
    let defender = library.short_name(&text.defender.name);
    let assister = text
        .assister
        .map(|p| library.short_name(&p.name))
        .unwrap_or_default();
    let made_fts = text.outcome.free_throws_made().to_string();
    let values = [
        ("attacker", attacker.as_str()),
        ("defender", defender.as_str()),
        ("assister", assister.as_str()),
        ("made", made_fts.as_str()),
    ];
    let position = Some(text.attacker.slot());
    let headline = PlayCategory::for_outcome(text.outcome);

    let render = |lang: Lang| {
        let mut parts = vec![line(library, headline, position, lang, &values)];
        if text.outcome.is_made() && text.assister.is_some() {
            parts.push(line(library, PlayCategory::AssistSuffix, position, lang, &values));
        }
        if let Outcome::FieldGoal {
            offensive_rebound: true,
            ..
        } = text.outcome
        {
            parts.push(line(library, PlayCategory::OffensiveRebound, position, lang, &values));
        }
        if let Some(category) = text.zone_entered.and_then(PlayCategory::for_zone) {
            parts.push(line(library, category, position, lang, &values));
        }
        join(&parts, lang)
    };

    Description {
        en: render(Lang::En),
        zh: render(Lang::Zh),
    }
}

/// Assemble the bilingual description of a substitution.
#[must_use]
pub fn describe_substitution<T: PlayTextLibrary + ?Sized>(
    library: &T,
    player_in: &PlayerRef,
    player_out: &PlayerRef,
) -> Description {
    let incoming = library.short_name(&player_in.name);
    let outgoing = library.short_name(&player_out.name);
    let values = [("in", incoming.as_str()), ("out", outgoing.as_str())];
    let position = Some(player_out.slot);
    Description {
        en: line(library, PlayCategory::Substitution, position, Lang::En, &values),
        zh: line(library, PlayCategory::Substitution, position, Lang::Zh, &values),
    }
}
