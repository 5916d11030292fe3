use serde::{Deserialize, Serialize};

/// Traits are stored on a unit scale.
pub const TRAIT_MIN: f32 = 0.0;
pub const TRAIT_MAX: f32 = 1.0;

/// A character as held by the backend and mirrored in character storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Character {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub personality: Personality,
    #[serde(default)]
    pub mood: Mood,
}

/// Five-factor personality vector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Personality {
    pub openness: f32,
    pub conscientiousness: f32,
    pub extraversion: f32,
    pub agreeableness: f32,
    pub neuroticism: f32,
}

/// Emotional state intensities. Values are never negative.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Mood {
    pub joy: f32,
    pub sadness: f32,
    pub anger: f32,
    pub fear: f32,
    pub surprise: f32,
    pub disgust: f32,
}

impl Default for Personality {
    fn default() -> Self {
        Self {
            openness: 0.5,
            conscientiousness: 0.5,
            extraversion: 0.5,
            agreeableness: 0.5,
            neuroticism: 0.5,
        }
    }
}

impl Personality {
    pub fn traits(&self) -> [(&'static str, f32); 5] {
        [
            ("Openness", self.openness),
            ("Conscientiousness", self.conscientiousness),
            ("Extraversion", self.extraversion),
            ("Agreeableness", self.agreeableness),
            ("Neuroticism", self.neuroticism),
        ]
    }

    /// Clamp every trait into `[TRAIT_MIN, TRAIT_MAX]`; NaN collapses to the midpoint.
    pub fn clamped(self) -> Self {
        fn clamp(value: f32) -> f32 {
            if value.is_nan() {
                (TRAIT_MIN + TRAIT_MAX) / 2.0
            } else {
                value.clamp(TRAIT_MIN, TRAIT_MAX)
            }
        }

        Self {
            openness: clamp(self.openness),
            conscientiousness: clamp(self.conscientiousness),
            extraversion: clamp(self.extraversion),
            agreeableness: clamp(self.agreeableness),
            neuroticism: clamp(self.neuroticism),
        }
    }
}

impl Mood {
    pub fn intensities(&self) -> [(&'static str, f32); 6] {
        [
            ("Joy", self.joy),
            ("Sadness", self.sadness),
            ("Anger", self.anger),
            ("Fear", self.fear),
            ("Surprise", self.surprise),
            ("Disgust", self.disgust),
        ]
    }

    pub fn clamped(self) -> Self {
        fn floor(value: f32) -> f32 {
            if value.is_nan() {
                0.0
            } else {
                value.max(0.0)
            }
        }

        Self {
            joy: floor(self.joy),
            sadness: floor(self.sadness),
            anger: floor(self.anger),
            fear: floor(self.fear),
            surprise: floor(self.surprise),
            disgust: floor(self.disgust),
        }
    }

    /// The strongest emotion, or `None` when every intensity is zero.
    /// Ties resolve to the earliest emotion in [`Mood::intensities`] order.
    pub fn dominant(&self) -> Option<(&'static str, f32)> {
        self.intensities()
            .into_iter()
            .filter(|(_, value)| *value > 0.0)
            .fold(None, |best, candidate| match best {
                Some((_, best_value)) if best_value >= candidate.1 => best,
                _ => Some(candidate),
            })
    }
}

impl Character {
    /// Normalize trait and mood values after loading from an untrusted source.
    pub fn normalized(mut self) -> Self {
        self.personality = self.personality.clamped();
        self.mood = self.mood.clamped();
        self
    }

    pub fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.id)
    }

    pub fn mood_summary(&self) -> String {
        match self.mood.dominant() {
            Some((label, _)) => label.to_lowercase(),
            None => "neutral".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Character {
        Character {
            id: "alice".to_string(),
            name: "Alice".to_string(),
            description: String::new(),
            personality: Personality::default(),
            mood: Mood::default(),
        }
    }

    #[test]
    fn deserializes_minimal_document_with_defaults() {
        let character: Character =
            serde_json::from_str(r#"{"id":"bob","name":"Bob"}"#).expect("valid json");
        assert_eq!(character.id, "bob");
        assert_eq!(character.personality, Personality::default());
        assert_eq!(character.mood, Mood::default());
        assert!(character.description.is_empty());
    }

    #[test]
    fn normalization_clamps_out_of_range_values() {
        let mut character = sample();
        character.personality.openness = 1.7;
        character.personality.neuroticism = -0.2;
        character.mood.anger = -3.0;
        character.mood.joy = 2.5;

        let normalized = character.normalized();
        assert_eq!(normalized.personality.openness, 1.0);
        assert_eq!(normalized.personality.neuroticism, 0.0);
        assert_eq!(normalized.mood.anger, 0.0);
        assert_eq!(normalized.mood.joy, 2.5);
    }

    #[test]
    fn dominant_mood_prefers_strongest_and_reports_neutral() {
        let mut character = sample();
        assert_eq!(character.mood_summary(), "neutral");

        character.mood.fear = 0.4;
        character.mood.surprise = 0.9;
        assert_eq!(character.mood_summary(), "surprise");

        character.mood.joy = 0.9;
        assert_eq!(character.mood.dominant().map(|(label, _)| label), Some("Joy"));
    }

    #[test]
    fn display_label_includes_id() {
        assert_eq!(sample().display_label(), "Alice (alice)");
    }
}
