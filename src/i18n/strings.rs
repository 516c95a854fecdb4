/// All localized prompt copy for one language edition.
///
/// The suggestion prompt is rendered in the language of the page the visitor
/// is currently reading, so every edition carries its own table.
#[derive(Debug, Clone)]
pub struct LocaleStrings {
    // ==================== Language Suggestion ====================
    /// Suggestion message.
    /// Placeholders: {language}
    pub suggestion_message: &'static str,

    /// Label of the link that switches to the suggested edition
    pub switch_label: &'static str,

    /// Label of the button that keeps the current edition for good
    pub stay_label: &'static str,

    /// Label of the button that hides the prompt for a short while
    pub dismiss_label: &'static str,

    // ==================== Analytics Consent ====================
    pub consent_title: &'static str,

    /// Body text of the consent prompt
    pub consent_text: &'static str,

    pub consent_accept: &'static str,

    pub consent_decline: &'static str,

    /// Text of the privacy-policy link inside the consent prompt
    pub consent_learn_more: &'static str,
}

impl LocaleStrings {
    /// Suggestion message naming the target edition by its native label.
    pub fn suggestion_for(&self, language_label: &str) -> String {
        self.suggestion_message.replace("{language}", language_label)
    }
}

// ==================== English Strings ====================

pub const ENGLISH_STRINGS: LocaleStrings = LocaleStrings {
    suggestion_message: "We detected {language}. Switch language?",
    switch_label: "Switch",
    stay_label: "Stay here",
    dismiss_label: "Not now",

    consent_title: "Cookies",
    consent_text: "We use optional cookies for anonymous analytics (Google Analytics) to improve the website.",
    consent_accept: "Accept",
    consent_decline: "Decline",
    consent_learn_more: "Privacy policy",
};

// ==================== German Strings ====================

pub const GERMAN_STRINGS: LocaleStrings = LocaleStrings {
    suggestion_message: "Wir haben {language} erkannt. Sprache wechseln?",
    switch_label: "Wechseln",
    stay_label: "Hier bleiben",
    dismiss_label: "Nicht jetzt",

    consent_title: "Cookies",
    consent_text: "Wir verwenden optionale Cookies für anonyme Analysen (Google Analytics), um die Website zu verbessern.",
    consent_accept: "Akzeptieren",
    consent_decline: "Ablehnen",
    consent_learn_more: "Datenschutz",
};

// ==================== Spanish Strings ====================

pub const SPANISH_STRINGS: LocaleStrings = LocaleStrings {
    suggestion_message: "Hemos detectado {language}. ¿Cambiar de idioma?",
    switch_label: "Cambiar",
    stay_label: "Quedarme aquí",
    dismiss_label: "Ahora no",

    consent_title: "Cookies",
    consent_text: "Usamos cookies opcionales de analítica anónima (Google Analytics) para mejorar el sitio web.",
    consent_accept: "Aceptar",
    consent_decline: "Rechazar",
    consent_learn_more: "Privacidad",
};

// ==================== Polish Strings ====================

pub const POLISH_STRINGS: LocaleStrings = LocaleStrings {
    suggestion_message: "Wykryliśmy {language}. Przełączyć język?",
    switch_label: "Przełącz",
    stay_label: "Zostań tutaj",
    dismiss_label: "Nie teraz",

    consent_title: "Cookies",
    consent_text: "Używamy opcjonalnych plików cookie do anonimowej analityki (Google Analytics), aby ulepszać stronę.",
    consent_accept: "Akceptuję",
    consent_decline: "Odrzuć",
    consent_learn_more: "Prywatność",
};

// ==================== Slovak Strings ====================

pub const SLOVAK_STRINGS: LocaleStrings = LocaleStrings {
    suggestion_message: "Zistili sme, že preferujete {language}. Prepnúť jazyk?",
    switch_label: "Prepnúť",
    stay_label: "Zostať tu",
    dismiss_label: "Teraz nie",

    consent_title: "Cookies",
    consent_text: "Používame voliteľné súbory cookie na anonymnú analytiku (Google Analytics), aby sme zlepšovali web.",
    consent_accept: "Súhlasím",
    consent_decline: "Odmietnuť",
    consent_learn_more: "Súkromie",
};
