//! Suggestions and analytics over the current thoughts.
//!
//! Everything here is a pure function of a thought slice (plus a random
//! source or a [`Moment`] where the output depends on them). Hosts recompute
//! when the thought count or session count changes.

use chrono::{DateTime, Datelike, Local, Timelike, Weekday};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::connection::{Connection, ConnectionKind};
use crate::relations::BALANCE_PAIRS;
use crate::thought::Thought;
use crate::zone::ZoneKind;

/// Category assigned when no keyword matches.
pub const GENERAL: &str = "general";

/// Keyword lists per thought category.
pub const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "emotions",
        &[
            "happy", "sad", "angry", "peaceful", "anxious", "calm", "excited", "tired", "love", "fear", "joy", "hope",
            "frustrated", "grateful", "lonely", "content",
        ],
    ),
    (
        "creativity",
        &[
            "idea", "dream", "imagine", "create", "art", "music", "write", "design", "inspire", "vision", "innovate",
            "explore", "experiment", "invent", "compose",
        ],
    ),
    (
        "work",
        &[
            "project", "deadline", "meeting", "task", "goal", "focus", "productivity", "schedule", "team", "review",
            "plan", "strategy", "client", "presentation", "email",
        ],
    ),
    (
        "wellness",
        &[
            "exercise", "meditate", "sleep", "health", "relax", "breathe", "nature", "balance", "rest", "energy",
            "nutrition", "yoga", "mindful", "walk", "stretch",
        ],
    ),
    (
        "relationships",
        &[
            "family", "friend", "connect", "talk", "listen", "support", "together", "share", "trust", "care", "partner",
            "children", "parent", "colleague", "community",
        ],
    ),
    (
        "growth",
        &[
            "learn", "grow", "change", "improve", "challenge", "achieve", "progress", "develop", "evolve", "transform",
            "skill", "knowledge", "wisdom", "practice", "master",
        ],
    ),
];

/// Follow-up words offered when a recent thought mentions the key.
const RELATED: &[(&str, &[&str])] = &[
    ("happy", &["gratitude", "celebrate", "joy", "smile", "contentment", "appreciate"]),
    ("sad", &["reflect", "accept", "heal", "support", "comfort", "process"]),
    ("angry", &["release", "understand", "communicate", "breathe", "forgive"]),
    ("anxious", &["ground", "breathe", "present", "accept", "calm", "reassure"]),
    ("stressed", &["breathe", "pause", "simplify", "release", "ground", "delegate"]),
    ("tired", &["rest", "recharge", "boundaries", "sleep", "nourish", "recover"]),
    ("lonely", &["reach out", "connect", "community", "share", "belong"]),
    ("work", &["prioritize", "delegate", "break", "achieve", "collaborate", "focus"]),
    ("project", &["milestone", "deadline", "team", "plan", "execute", "review"]),
    ("meeting", &["prepare", "agenda", "notes", "action items", "follow up"]),
    ("deadline", &["prioritize", "focus", "plan", "delegate", "complete"]),
    ("goal", &["plan", "action", "milestone", "celebrate", "adjust", "visualize"]),
    ("creative", &["explore", "experiment", "play", "wonder", "innovate", "express"]),
    ("idea", &["develop", "test", "share", "refine", "implement", "brainstorm"]),
    ("dream", &["visualize", "plan", "believe", "pursue", "manifest"]),
    ("love", &["appreciate", "express", "nurture", "cherish", "connect", "show"]),
    ("family", &["quality time", "support", "communicate", "traditions", "memories"]),
    ("friend", &["reach out", "listen", "support", "adventure", "share"]),
    ("health", &["exercise", "nutrition", "sleep", "checkup", "hydrate", "move"]),
    ("exercise", &["consistency", "variety", "strength", "cardio", "flexibility"]),
    ("meditate", &["breathe", "focus", "presence", "peace", "awareness"]),
    ("sleep", &["routine", "relax", "unwind", "rest", "recover"]),
    ("learn", &["practice", "apply", "teach", "explore", "curiosity", "study"]),
    ("grow", &["challenge", "reflect", "adapt", "persist", "evolve"]),
    ("fear", &["courage", "face", "understand", "release", "transform", "accept"]),
    ("change", &["adapt", "embrace", "opportunity", "growth", "transition"]),
    ("morning", &["routine", "gratitude", "intention", "energy", "breakfast"]),
    ("evening", &["reflect", "unwind", "gratitude", "prepare", "rest"]),
    ("weekend", &["recharge", "adventure", "family", "hobbies", "rest"]),
];

const STARTERS: &[&str] = &[
    "gratitude", "goals", "ideas", "reflect", "dream", "create", "connect", "grow", "peace", "energy",
];

const POSITIVE_WORDS: &[&str] = &[
    "happy", "joy", "love", "hope", "peace", "calm", "excited", "grateful", "content", "inspired", "proud",
    "confident", "energized", "optimistic", "blessed", "thankful",
];

const NEGATIVE_WORDS: &[&str] = &[
    "sad", "angry", "fear", "anxious", "stress", "tired", "overwhelmed", "frustrated", "worried", "lonely", "hurt",
    "disappointed", "confused", "lost", "stuck",
];

const NEUTRAL_MOOD: u32 = 50;
const MOOD_STEP: i32 = 8;
const RELATED_PICKS: usize = 3;
const SIBLING_PICKS: usize = 2;
const MOOD_TREND_LEN: usize = 10;
const TIMELINE_LEN: usize = 20;
const MAX_INSIGHTS: usize = 4;

/// Local hour and weekday, the inputs to time-of-day suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moment {
    pub hour: u32,
    pub weekday: Weekday,
}

impl Moment {
    pub fn now() -> Self {
        let now = Local::now();
        Self {
            hour: now.hour(),
            weekday: now.weekday(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    pub max_suggestions: usize,
    /// Offer the complement of balance-pair words.
    pub include_balance: bool,
    /// How many of the newest thoughts seed suggestions.
    pub recent_count: usize,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            max_suggestions: 5,
            include_balance: true,
            recent_count: 5,
        }
    }
}

fn push_unique(out: &mut Vec<String>, word: &str) {
    if !out.iter().any(|w| w == word) {
        out.push(word.to_string());
    }
}

/// Words the user might add next.
pub fn suggestions<R: Rng + ?Sized>(
    thoughts: &[Thought],
    config: &SuggestionConfig,
    moment: Moment,
    rng: &mut R,
) -> Vec<String> {
    if thoughts.is_empty() {
        return STARTERS
            .choose_multiple(rng, config.max_suggestions)
            .map(|s| s.to_string())
            .collect();
    }

    let mut picked: Vec<String> = Vec::new();
    let recent = &thoughts[thoughts.len().saturating_sub(config.recent_count)..];

    for thought in recent {
        let text = thought.text.to_lowercase();

        for (key, values) in RELATED {
            if text.contains(key) {
                for v in values.choose_multiple(rng, RELATED_PICKS) {
                    push_unique(&mut picked, v);
                }
            }
        }

        for (_, keywords) in CATEGORIES {
            for keyword in keywords.iter().filter(|k| text.contains(*k)) {
                let siblings: Vec<&str> = keywords.iter().copied().filter(|k| k != keyword).collect();
                for v in siblings.choose_multiple(rng, SIBLING_PICKS) {
                    push_unique(&mut picked, v);
                }
            }
        }

        if config.include_balance {
            for (word, opposite) in BALANCE_PAIRS {
                if text.contains(word) {
                    push_unique(&mut picked, opposite);
                }
            }
        }
    }

    let existing: Vec<String> = thoughts.iter().map(|t| t.text.trim().to_lowercase()).collect();
    let mut filtered: Vec<String> = picked.into_iter().filter(|s| !existing.contains(s)).collect();

    if filtered.len() < config.max_suggestions {
        for s in contextual_suggestions(moment) {
            if !existing.iter().any(|e| e == s) {
                push_unique(&mut filtered, s);
            }
        }
    }

    filtered.truncate(config.max_suggestions);
    filtered
}

/// Time-of-day and day-of-week fallbacks.
pub fn contextual_suggestions(moment: Moment) -> Vec<&'static str> {
    let mut out = match moment.hour {
        5..=11 => vec!["morning intention", "energy", "gratitude", "plan today"],
        12..=16 => vec!["focus", "progress", "break", "nourish"],
        17..=20 => vec!["reflect", "unwind", "connect", "appreciate"],
        _ => vec!["rest", "peaceful", "tomorrow", "dreams"],
    };
    match moment.weekday {
        Weekday::Sat | Weekday::Sun => out.extend(["recharge", "adventure", "family time", "hobbies"]),
        Weekday::Mon => out.extend(["fresh start", "weekly goals", "motivation"]),
        Weekday::Fri => out.extend(["celebrate wins", "weekend plans", "reflect on week"]),
        _ => {}
    }
    out
}

/// Categories whose keywords appear in `text`, or `["general"]`.
pub fn categorize(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    let found: Vec<&'static str> = CATEGORIES
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(name, _)| *name)
        .collect();
    if found.is_empty() {
        vec![GENERAL]
    } else {
        found
    }
}

/// 0-100, starting at 50 and moving 8 per positive or negative keyword.
pub fn mood_score(text: &str) -> u32 {
    let lower = text.to_lowercase();
    let count = |words: &[&str]| words.iter().filter(|w| lower.contains(*w)).count() as i32;
    let score = NEUTRAL_MOOD as i32 + MOOD_STEP * (count(POSITIVE_WORDS) - count(NEGATIVE_WORDS));
    score.clamp(0, 100) as u32
}

/// Percentages of thoughts by mood band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MoodDistribution {
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
}

/// Thought counts per zone, plus free-floating ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ZoneDistribution {
    pub creative: usize,
    pub focus: usize,
    pub organize: usize,
    pub relax: usize,
    pub floating: usize,
}

impl ZoneDistribution {
    pub fn get(&self, kind: ZoneKind) -> usize {
        match kind {
            ZoneKind::Creative => self.creative,
            ZoneKind::Focus => self.focus,
            ZoneKind::Organize => self.organize,
            ZoneKind::Relax => self.relax,
        }
    }

    /// The zone holding the most thoughts, first in zone order on ties.
    pub fn busiest(&self) -> Option<ZoneKind> {
        let mut best: Option<(ZoneKind, usize)> = None;
        for kind in ZoneKind::ALL {
            let n = self.get(kind);
            if n > 0 && best.map_or(true, |(_, m)| n > m) {
                best = Some((kind, n));
            }
        }
        best.map(|(kind, _)| kind)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub text: String,
    pub created_at: u64,
    pub mood: u32,
    pub category: &'static str,
}

/// Everything the analytics panel shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analytics {
    pub total_thoughts: usize,
    /// Rounded to one decimal.
    pub avg_per_session: f32,
    /// Counts in category order, `general` last; zero counts omitted.
    pub category_breakdown: Vec<(&'static str, usize)>,
    pub mood_trend: Vec<u32>,
    pub average_mood: u32,
    pub mood_distribution: MoodDistribution,
    pub zone_distribution: ZoneDistribution,
    /// Thoughts created per weekday, Sunday first.
    pub activity_heatmap: [usize; 7],
    pub top_themes: Vec<&'static str>,
    /// Thought pairs sharing a non-general category.
    pub connection_count: usize,
    pub timeline: Vec<TimelineEntry>,
    pub insights: Vec<String>,
}

impl Analytics {
    fn empty() -> Self {
        Self {
            total_thoughts: 0,
            avg_per_session: 0.0,
            category_breakdown: Vec::new(),
            mood_trend: Vec::new(),
            average_mood: NEUTRAL_MOOD,
            mood_distribution: MoodDistribution::default(),
            zone_distribution: ZoneDistribution::default(),
            activity_heatmap: [0; 7],
            top_themes: Vec::new(),
            connection_count: 0,
            timeline: Vec::new(),
            insights: vec!["Add some thoughts to see analytics!".to_string()],
        }
    }
}

pub fn analyze(thoughts: &[Thought], sessions: u32) -> Analytics {
    if thoughts.is_empty() {
        return Analytics::empty();
    }

    let total = thoughts.len();
    let avg_per_session = if sessions > 0 {
        (total as f32 / sessions as f32 * 10.0).round() / 10.0
    } else {
        total as f32
    };

    Analytics {
        total_thoughts: total,
        avg_per_session,
        category_breakdown: category_breakdown(thoughts),
        mood_trend: mood_trend(thoughts, MOOD_TREND_LEN),
        average_mood: average_mood(thoughts),
        mood_distribution: mood_distribution(thoughts),
        zone_distribution: zone_distribution(thoughts),
        activity_heatmap: activity_heatmap(thoughts),
        top_themes: top_themes(thoughts, 3),
        connection_count: count_overlaps(thoughts),
        timeline: timeline(thoughts),
        insights: insights(thoughts),
    }
}

pub fn category_breakdown(thoughts: &[Thought]) -> Vec<(&'static str, usize)> {
    let mut counts: Vec<(&'static str, usize)> = CATEGORIES
        .iter()
        .map(|(name, _)| (*name, 0))
        .chain(std::iter::once((GENERAL, 0)))
        .collect();
    for t in thoughts {
        for category in categorize(&t.text) {
            if let Some(entry) = counts.iter_mut().find(|(name, _)| *name == category) {
                entry.1 += 1;
            }
        }
    }
    counts.retain(|(_, n)| *n > 0);
    counts
}

pub fn mood_trend(thoughts: &[Thought], count: usize) -> Vec<u32> {
    thoughts[thoughts.len().saturating_sub(count)..]
        .iter()
        .map(|t| mood_score(&t.text))
        .collect()
}

pub fn average_mood(thoughts: &[Thought]) -> u32 {
    if thoughts.is_empty() {
        return NEUTRAL_MOOD;
    }
    let sum: u32 = thoughts.iter().map(|t| mood_score(&t.text)).sum();
    (sum as f32 / thoughts.len() as f32).round() as u32
}

pub fn mood_distribution(thoughts: &[Thought]) -> MoodDistribution {
    if thoughts.is_empty() {
        return MoodDistribution::default();
    }
    let (mut pos, mut neg, mut neu) = (0usize, 0usize, 0usize);
    for t in thoughts {
        match mood_score(&t.text) {
            s if s >= 60 => pos += 1,
            s if s <= 40 => neg += 1,
            _ => neu += 1,
        }
    }
    let pct = |n: usize| (n as f32 / thoughts.len() as f32 * 100.0).round() as u32;
    MoodDistribution {
        positive: pct(pos),
        neutral: pct(neu),
        negative: pct(neg),
    }
}

pub fn zone_distribution(thoughts: &[Thought]) -> ZoneDistribution {
    let mut out = ZoneDistribution::default();
    for t in thoughts {
        match t.zone() {
            Some(ZoneKind::Creative) => out.creative += 1,
            Some(ZoneKind::Focus) => out.focus += 1,
            Some(ZoneKind::Organize) => out.organize += 1,
            Some(ZoneKind::Relax) => out.relax += 1,
            None => out.floating += 1,
        }
    }
    out
}

/// Local weekday (Sunday = 0) of each thought's creation time. Thoughts
/// without a timestamp are spread by position.
pub fn activity_heatmap(thoughts: &[Thought]) -> [usize; 7] {
    let mut heatmap = [0; 7];
    for (i, t) in thoughts.iter().enumerate() {
        let day = i64::try_from(t.created_at)
            .ok()
            .filter(|ms| *ms > 0)
            .and_then(DateTime::from_timestamp_millis)
            .map(|utc| utc.with_timezone(&Local).weekday().num_days_from_sunday() as usize)
            .unwrap_or(i % 7);
        heatmap[day] += 1;
    }
    heatmap
}

/// The most frequent non-general categories, most frequent first.
pub fn top_themes(thoughts: &[Thought], count: usize) -> Vec<&'static str> {
    let mut breakdown = category_breakdown(thoughts);
    breakdown.retain(|(name, _)| *name != GENERAL);
    // stable: ties keep category order
    breakdown.sort_by(|a, b| b.1.cmp(&a.1));
    breakdown.into_iter().take(count).map(|(name, _)| name).collect()
}

fn shared_categories(a: &str, b: &str) -> Vec<&'static str> {
    let cb = categorize(b);
    categorize(a)
        .into_iter()
        .filter(|c| *c != GENERAL && cb.contains(c))
        .collect()
}

pub fn count_overlaps(thoughts: &[Thought]) -> usize {
    let cats: Vec<Vec<&'static str>> = thoughts.iter().map(|t| categorize(&t.text)).collect();
    let mut n = 0;
    for i in 0..cats.len() {
        for j in (i + 1)..cats.len() {
            if cats[i].iter().any(|c| *c != GENERAL && cats[j].contains(c)) {
                n += 1;
            }
        }
    }
    n
}

pub fn timeline(thoughts: &[Thought]) -> Vec<TimelineEntry> {
    let stamped: Vec<&Thought> = thoughts.iter().filter(|t| t.created_at > 0).collect();
    stamped[stamped.len().saturating_sub(TIMELINE_LEN)..]
        .iter()
        .map(|t| TimelineEntry {
            text: t.text.clone(),
            created_at: t.created_at,
            mood: mood_score(&t.text),
            category: categorize(&t.text)[0],
        })
        .collect()
}

fn zone_message(kind: ZoneKind) -> &'static str {
    match kind {
        ZoneKind::Creative => "🎨 You're in a creative flow! Keep exploring.",
        ZoneKind::Focus => "🎯 Strong focus energy - you're getting things done.",
        ZoneKind::Organize => "📊 Organization mode active - bringing order to chaos.",
        ZoneKind::Relax => "🌙 Taking time to relax - self-care is important.",
    }
}

pub fn insights(thoughts: &[Thought]) -> Vec<String> {
    if thoughts.is_empty() {
        return vec!["Start adding thoughts to unlock insights!".to_string()];
    }
    let mut out = Vec::new();

    let avg = average_mood(thoughts);
    let mood = if avg >= 70 {
        "🌟 Your thoughts are predominantly positive! Keep that energy flowing."
    } else if avg >= 50 {
        "⚖️ Your mood balance is healthy with a mix of emotions."
    } else {
        "💙 Consider adding some gratitude or positive intentions to lift your spirits."
    };
    out.push(mood.to_string());

    let themes = top_themes(thoughts, 2);
    if !themes.is_empty() {
        out.push(format!("🎯 Your mind is focused on: {}", themes.join(" & ")));
    }

    if let Some(zone) = zone_distribution(thoughts).busiest() {
        out.push(zone_message(zone).to_string());
    }

    if thoughts.len() >= 10 {
        out.push(format!("📝 You've captured {} thoughts - great reflection habit!", thoughts.len()));
    } else if thoughts.len() >= 5 {
        out.push("📝 Good start! Keep capturing your thoughts.".to_string());
    }

    let trend = mood_trend(thoughts, 5);
    if trend.len() >= 3 && trend[trend.len() - 1] > trend[0] {
        out.push("📈 Your mood is trending upward - something's working!".to_string());
    }

    let breakdown = category_breakdown(thoughts);
    let has = |name: &str| breakdown.iter().any(|(c, _)| *c == name);
    if has("work") && !has("wellness") {
        out.push("💡 Tip: Balance work thoughts with some wellness intentions.".to_string());
    }

    out.truncate(MAX_INSIGHTS);
    out
}

/// Related links between thoughts that share a category or form a balance
/// pair. One candidate per pair and reason; the caller deduplicates.
pub fn related_links(thoughts: &[Thought], now_ms: u64) -> Vec<Connection> {
    let mut out = Vec::new();
    for (i, a) in thoughts.iter().enumerate() {
        for b in &thoughts[i + 1..] {
            let shared = shared_categories(&a.text, &b.text);
            if let Some(first) = shared.first() {
                let mut link = Connection::new(a.id, b.id, ConnectionKind::Related, now_ms);
                link.strength = 0.3 * shared.len() as f32;
                link.reason = Some(format!("shared category: {first}"));
                out.push(link);
            }

            let (ta, tb) = (a.text.to_lowercase(), b.text.to_lowercase());
            let balanced = BALANCE_PAIRS.iter().any(|(w, o)| {
                (ta.contains(w) && tb.contains(o)) || (ta.contains(o) && tb.contains(w))
            });
            if balanced {
                let mut link = Connection::new(a.id, b.id, ConnectionKind::Related, now_ms);
                link.strength = 0.8;
                link.reason = Some("complementary pair".to_string());
                out.push(link);
            }
        }
    }
    out
}
