//! Word tables for [`LexiconScorer`](super::sentiment_service::LexiconScorer).
//!
//! Polarity values sit in [-1, 1]. Entries are lower-case; accented and
//! unaccented Spanish spellings are both listed since posts often omit accents.

pub(crate) const POLARITY: &[(&str, f64)] = &[
    // Spanish, positive
    ("bueno", 0.7),
    ("buena", 0.7),
    ("buenos", 0.7),
    ("buenas", 0.7),
    ("bien", 0.5),
    ("genial", 0.8),
    ("guay", 0.7),
    ("feliz", 0.8),
    ("felices", 0.8),
    ("alegre", 0.7),
    ("alegría", 0.8),
    ("alegria", 0.8),
    ("encanta", 0.8),
    ("encantado", 0.7),
    ("encantada", 0.7),
    ("maravilloso", 0.9),
    ("maravillosa", 0.9),
    ("excelente", 0.9),
    ("fantástico", 0.9),
    ("fantastico", 0.9),
    ("fantástica", 0.9),
    ("fantastica", 0.9),
    ("increíble", 0.8),
    ("increible", 0.8),
    ("estupendo", 0.8),
    ("estupenda", 0.8),
    ("perfecto", 0.9),
    ("perfecta", 0.9),
    ("precioso", 0.8),
    ("preciosa", 0.8),
    ("bonito", 0.6),
    ("bonita", 0.6),
    ("hermoso", 0.7),
    ("hermosa", 0.7),
    ("amor", 0.6),
    ("amo", 0.6),
    ("gracias", 0.4),
    ("divertido", 0.6),
    ("divertida", 0.6),
    ("mejor", 0.6),
    ("éxito", 0.7),
    ("exito", 0.7),
    ("contento", 0.7),
    ("contenta", 0.7),
    ("gusta", 0.5),
    ("brillante", 0.7),
    ("agradable", 0.6),
    // Spanish, negative
    ("malo", -0.7),
    ("mala", -0.7),
    ("malos", -0.7),
    ("malas", -0.7),
    ("mal", -0.6),
    ("triste", -0.6),
    ("tristes", -0.6),
    ("tristeza", -0.6),
    ("horrible", -0.9),
    ("terrible", -0.9),
    ("fatal", -0.8),
    ("odio", -0.8),
    ("odia", -0.8),
    ("asco", -0.8),
    ("asqueroso", -0.8),
    ("asquerosa", -0.8),
    ("peor", -0.7),
    ("pésimo", -0.9),
    ("pesimo", -0.9),
    ("pésima", -0.9),
    ("pesima", -0.9),
    ("aburrido", -0.5),
    ("aburrida", -0.5),
    ("enfadado", -0.6),
    ("enfadada", -0.6),
    ("furioso", -0.8),
    ("furiosa", -0.8),
    ("miedo", -0.5),
    ("problema", -0.4),
    ("fracaso", -0.7),
    ("cansado", -0.4),
    ("cansada", -0.4),
    ("decepcionado", -0.6),
    ("decepcionada", -0.6),
    ("feo", -0.6),
    ("fea", -0.6),
    ("dolor", -0.6),
    ("desastre", -0.8),
    // English, positive
    ("good", 0.7),
    ("great", 0.8),
    ("nice", 0.6),
    ("happy", 0.8),
    ("love", 0.6),
    ("loved", 0.6),
    ("lovely", 0.7),
    ("awesome", 0.9),
    ("amazing", 0.8),
    ("wonderful", 0.9),
    ("excellent", 0.9),
    ("fantastic", 0.9),
    ("beautiful", 0.8),
    ("best", 0.9),
    ("better", 0.5),
    ("fun", 0.4),
    ("glad", 0.5),
    ("cool", 0.4),
    ("perfect", 0.9),
    ("enjoy", 0.5),
    ("thanks", 0.3),
    ("excited", 0.6),
    ("brilliant", 0.8),
    // English, negative
    ("bad", -0.7),
    ("sad", -0.6),
    ("awful", -0.9),
    ("hate", -0.8),
    ("hated", -0.8),
    ("worst", -0.9),
    ("worse", -0.6),
    ("angry", -0.6),
    ("ugly", -0.7),
    ("boring", -0.6),
    ("disgusting", -0.9),
    ("annoying", -0.6),
    ("poor", -0.4),
    ("wrong", -0.5),
    ("tired", -0.4),
    ("broken", -0.5),
    ("disappointed", -0.6),
    ("sucks", -0.7),
];

/// Multipliers applied to the next opinion word.
pub(crate) const INTENSIFIERS: &[(&str, f64)] = &[
    ("muy", 1.3),
    ("más", 1.3),
    ("mas", 1.3),
    ("tan", 1.2),
    ("super", 1.4),
    ("súper", 1.4),
    ("re", 1.2),
    ("bastante", 1.1),
    ("demasiado", 1.3),
    ("very", 1.3),
    ("really", 1.2),
    ("so", 1.2),
    ("extremely", 1.5),
    ("too", 1.2),
    ("quite", 1.1),
];

/// Words that flip the polarity of the following opinion word.
pub(crate) const NEGATORS: &[&str] = &[
    "no", "nunca", "jamás", "jamas", "tampoco", "ni", "not", "never", "don't", "dont", "isn't",
    "isnt", "without",
];
