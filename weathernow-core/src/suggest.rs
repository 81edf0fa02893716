//! Activity suggestions from a condition label and temperature.

const COLD_ADVISORY: &str = "It is quite cold; dress warmly.";
const HOT_ADVISORY: &str = "It is very hot; stay hydrated and avoid prolonged sun.";

const COLD_AT_OR_BELOW_C: f64 = 5.0;
const HOT_AT_OR_ABOVE_C: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityCategory {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Default,
}

impl ActivityCategory {
    /// Keyword table, checked top to bottom; the first hit wins.
    const KEYWORDS: &'static [(ActivityCategory, &'static [&'static str])] = &[
        (ActivityCategory::Clear, &["clear", "sun"]),
        (ActivityCategory::Clouds, &["cloud"]),
        (ActivityCategory::Rain, &["rain"]),
        (ActivityCategory::Drizzle, &["drizzle"]),
        (ActivityCategory::Thunderstorm, &["thunder"]),
        (ActivityCategory::Snow, &["snow", "sleet"]),
        (ActivityCategory::Mist, &["mist", "fog"]),
    ];

    /// Case-insensitive substring classification of a condition label.
    pub fn classify(label: &str) -> Self {
        let label = label.to_lowercase();
        Self::KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| label.contains(w)))
            .map(|(category, _)| *category)
            .unwrap_or(ActivityCategory::Default)
    }

    fn lines(&self) -> [&'static str; 3] {
        match self {
            ActivityCategory::Clear => [
                "A clear day, perfect for a picnic in the park.",
                "Great time for a jog or bike ride; enjoy the sunshine.",
                "Bring sunglasses and a camera for bright, scenic shots.",
            ],
            ActivityCategory::Clouds => [
                "Cloudy skies make for a calm, pleasant walk.",
                "Good day for a coffee outdoors under light cloud cover.",
                "Light layering is ideal; a sweater should do.",
            ],
            ActivityCategory::Rain => [
                "Rainy weather makes a cozy day for indoor reading or a cafe visit.",
                "Carry an umbrella if you need to step out; puddles likely.",
                "Perfect excuse to watch a movie or try a new recipe at home.",
            ],
            ActivityCategory::Drizzle => [
                "Drizzle outside; a short walk with a light jacket is fine.",
                "Great day for a museum or indoor stroll.",
                "Keep shoes dry and plan indoor activities if possible.",
            ],
            ActivityCategory::Thunderstorm => [
                "Thunderstorms around; best to stay indoors and stay safe.",
                "Avoid outdoor activities and unplug sensitive electronics.",
                "Check local alerts and reschedule any open-air plans.",
            ],
            ActivityCategory::Snow => [
                "Snowy conditions are great for making snowmen or sledding.",
                "Bundle up warmly; layers and a good coat are recommended.",
                "If travelling, allow extra time and drive carefully.",
            ],
            ActivityCategory::Mist => [
                "Misty air makes for a peaceful short walk.",
                "Drive carefully as visibility may be reduced.",
                "A warm drink inside sounds lovely while the mist clears.",
            ],
            ActivityCategory::Default => [
                "Nice day to be mindful; pick an activity you love.",
                "Check the forecast details and plan accordingly.",
                "Layer up if temperatures are variable throughout the day.",
            ],
        }
    }
}

/// Three sentences of guidance for the given conditions.
///
/// At or below 5 °C a cold advisory replaces the third line, at or above
/// 30 °C a hot one does. A missing or non-finite temperature adds no advisory.
pub fn suggest(condition_label: &str, temperature_c: Option<f64>) -> String {
    let [first, second, third] = ActivityCategory::classify(condition_label).lines();

    let advisory = temperature_c.filter(|t| t.is_finite()).and_then(|t| {
        if t <= COLD_AT_OR_BELOW_C {
            Some(COLD_ADVISORY)
        } else if t >= HOT_AT_OR_ABOVE_C {
            Some(HOT_ADVISORY)
        } else {
            None
        }
    });

    match advisory {
        Some(note) => [note, first, second].join(" "),
        None => [first, second, third].join(" "),
    }
}
