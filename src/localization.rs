use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::collections::HashMap;
use std::sync::LazyLock;
use unic_langid::LanguageIdentifier;
use anyhow::{anyhow, Result};

/// Language used when the user's language has no bundle
pub const DEFAULT_LANGUAGE: &str = "en";

const EN_MESSAGES: &str = include_str!("../locales/en/main.ftl");

/// Localization manager for the eSIM plans bot
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
}

impl LocalizationManager {
    /// Create a new localization manager
    pub fn new() -> Result<Self> {
        let mut bundles = HashMap::new();

        // Load English bundle
        let en_locale: LanguageIdentifier = DEFAULT_LANGUAGE.parse()?;
        let bundle = Self::create_bundle(&en_locale, EN_MESSAGES)?;
        bundles.insert(DEFAULT_LANGUAGE.to_string(), bundle);

        Ok(Self { bundles })
    }

    /// Create a fluent bundle for a specific locale
    fn create_bundle(locale: &LanguageIdentifier, source: &str) -> Result<FluentBundle<FluentResource>> {
        let mut bundle = FluentBundle::new_concurrent(vec![locale.clone()]);
        // No bidi isolation marks around placeables
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(source.to_string())
            .map_err(|(_, errors)| anyhow!("Invalid messages for {locale}: {errors:?}"))?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("Duplicate messages for {locale}: {errors:?}"))?;

        Ok(bundle)
    }

    /// Check whether a language has its own bundle
    pub fn is_language_supported(&self, language: &str) -> bool {
        self.bundles.contains_key(&Self::primary_language(language))
    }

    /// "en-US" -> "en"
    fn primary_language(language: &str) -> String {
        language
            .split(['-', '_'])
            .next()
            .unwrap_or(DEFAULT_LANGUAGE)
            .to_lowercase()
    }

    /// Get a localized message in a language, falling back to English
    pub fn get_message_in_language(
        &self,
        key: &str,
        language: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let bundle = match self
            .bundles
            .get(&Self::primary_language(language))
            .or_else(|| self.bundles.get(DEFAULT_LANGUAGE))
        {
            Some(bundle) => bundle,
            None => return format!("Missing translation: {}", key),
        };

        let msg = match bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {}", key),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {}", key),
        };

        let fluent_args = args.map(|args| {
            FluentArgs::from_iter(args.iter().map(|(k, v)| (*k, FluentValue::from(*v))))
        });

        let mut errors = vec![];
        bundle
            .format_pattern(pattern, fluent_args.as_ref(), &mut errors)
            .into_owned()
    }
}

static LOCALIZATION_MANAGER: LazyLock<Option<LocalizationManager>> = LazyLock::new(|| {
    match LocalizationManager::new() {
        Ok(manager) => Some(manager),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load localization bundles");
            None
        }
    }
});

/// Load the bundles up front so a broken message file fails at startup
pub fn init_localization() -> Result<()> {
    LOCALIZATION_MANAGER
        .as_ref()
        .map(|_| ())
        .ok_or_else(|| anyhow!("Localization bundles failed to load"))
}

/// Map a Telegram language code to a supported language, defaulting to English
pub fn detect_language(language_code: Option<&str>) -> String {
    match (language_code, LOCALIZATION_MANAGER.as_ref()) {
        (Some(code), Some(manager)) if manager.is_language_supported(code) => {
            LocalizationManager::primary_language(code)
        }
        _ => DEFAULT_LANGUAGE.to_string(),
    }
}

/// Get a localized message for the user's language
pub fn t_lang(key: &str, language_code: Option<&str>) -> String {
    t_args_lang(key, &[], language_code)
}

/// Get a localized message with arguments for the user's language
pub fn t_args_lang(key: &str, args: &[(&str, &str)], language_code: Option<&str>) -> String {
    match LOCALIZATION_MANAGER.as_ref() {
        Some(manager) => {
            let language = detect_language(language_code);
            let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
            let args = (!args_map.is_empty()).then_some(&args_map);
            manager.get_message_in_language(key, &language, args)
        }
        None => format!("Missing translation: {}", key),
    }
}

/// Convenience function to get an English message
pub fn t(key: &str) -> String {
    t_lang(key, None)
}

/// Convenience function to get an English message with arguments
pub fn t_args(key: &str, args: &[(&str, &str)]) -> String {
    t_args_lang(key, args, None)
}
