//! HTML rendering.
//!
//! Every user-visible string goes through the [`Localizer`]; nothing here
//! reads the session or picks a locale on its own.

use crate::i18n::{Locale, Localizer};

/// Source strings shown on the index page. These are the catalog keys.
pub mod messages {
    pub const PORTAL_TITLE: &str = "Teachers Portal";
    pub const WELCOME: &str = "Welcome to the Teachers Portal";
    pub const INTRO: &str = "Manage your courses, classes and live sessions in one place.";
    pub const DASHBOARD: &str = "Dashboard";
    pub const COURSES: &str = "My Courses";
    pub const LIVE_CLASSES: &str = "Live Classes";
    pub const LOGOUT: &str = "Logout";
    pub const LANGUAGE: &str = "Language";
    pub const CHOOSE_LANGUAGE: &str = "Choose your language";
    pub const CURRENT_LANGUAGE: &str = "Current language";
    pub const LANGUAGES_AVAILABLE: &str = "%(num)d language available";
    pub const LANGUAGES_AVAILABLE_PLURAL: &str = "%(num)d languages available";
    /// Context for navigation labels
    pub const NAV_CONTEXT: &str = "navigation";
    pub const HOME: &str = "Home";
}

/// Render the portal index page with the language switcher.
pub fn render_index(loc: &Localizer<'_>, locales: &[Locale]) -> String {
    use messages::*;

    let active = loc.locale();
    let count = locales.len() as u64;
    let count_text = count.to_string();
    let available = interpolate(
        loc.tn(LANGUAGES_AVAILABLE, LANGUAGES_AVAILABLE_PLURAL, count),
        &[("num", count_text.as_str())],
    );

    let nav = [
        ("/", loc.tp(NAV_CONTEXT, HOME)),
        ("/dashboard", loc.t(DASHBOARD)),
        ("/courses", loc.t(COURSES)),
        ("/live", loc.t(LIVE_CLASSES)),
        ("/logout", loc.t(LOGOUT)),
    ]
    .iter()
    .map(|(href, label)| format!("<li><a href=\"{}\">{}</a></li>", href, escape_html(label)))
    .collect::<Vec<_>>()
    .join("");

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<nav><ul>{nav}</ul></nav>
<main>
<h1>{welcome}</h1>
<p>{intro}</p>
</main>
<aside>
{switcher}
</aside>
<footer><p>{current_label}: {current_flag} {current_name}</p><p>{available}</p></footer>
</body>
</html>
"#,
        lang = active.code(),
        title = escape_html(loc.t(PORTAL_TITLE)),
        nav = nav,
        welcome = escape_html(loc.t(WELCOME)),
        intro = escape_html(loc.t(INTRO)),
        switcher = render_switcher(loc, locales),
        current_label = escape_html(loc.t(CURRENT_LANGUAGE)),
        current_flag = active.flag(),
        current_name = escape_html(active.native_name()),
        available = escape_html(&available),
    )
}

/// Render the language switcher: one link per enabled locale.
pub fn render_switcher(loc: &Localizer<'_>, locales: &[Locale]) -> String {
    let active = loc.locale();

    let items: String = locales
        .iter()
        .map(|locale| {
            let current = if *locale == active {
                " aria-current=\"true\""
            } else {
                ""
            };
            format!(
                "<li><a href=\"/set_language/{code}\" hreflang=\"{code}\" lang=\"{code}\"{current}>{flag} {name}</a></li>",
                code = locale.code(),
                current = current,
                flag = locale.flag(),
                name = escape_html(locale.native_name()),
            )
        })
        .collect();

    format!(
        "<section class=\"language-switcher\" aria-label=\"{label}\"><h2>{label}</h2><p>{prompt}</p><ul>{items}</ul></section>",
        label = escape_html(loc.t(messages::LANGUAGE)),
        prompt = escape_html(loc.t(messages::CHOOSE_LANGUAGE)),
        items = items,
    )
}

/// Substitute `%(name)s` / `%(name)d` placeholders.
pub fn interpolate(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in values {
        for conversion in ['s', 'd'] {
            out = out.replace(&format!("%({}){}", name, conversion), value);
        }
    }
    out
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::mo::MoEntry;
    use crate::i18n::{Catalog, CatalogSet, LocaleRegistry, Translator};

    fn translator() -> Translator {
        let registry = LocaleRegistry::builtin();
        let mut catalogs = CatalogSet::new();
        catalogs.insert(
            registry.resolve("hi").unwrap(),
            Catalog::from_entries(vec![
                MoEntry {
                    original: messages::WELCOME.to_string(),
                    translation: "शिक्षक पोर्टल में आपका स्वागत है".to_string(),
                },
                MoEntry {
                    original: "%(num)d language available\0%(num)d languages available"
                        .to_string(),
                    translation: "%(num)d भाषा उपलब्ध है\0%(num)d भाषाएँ उपलब्ध हैं".to_string(),
                },
            ])
            .unwrap(),
        );
        Translator::new(registry, catalogs)
    }

    #[test]
    fn test_interpolate() {
        assert_eq!(
            interpolate("%(num)d of %(total)s", &[("num", "2"), ("total", "5")]),
            "2 of 5"
        );
        assert_eq!(interpolate("no placeholders", &[("num", "2")]), "no placeholders");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>\"Tom\" & 'Jerry'</b>"),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#x27;Jerry&#x27;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_render_index_english_uses_source_strings() {
        let t = translator();
        let locales = t.registry().list_enabled();
        let html = render_index(&t.localizer(t.registry().default_locale()), &locales);

        assert!(html.contains("<html lang=\"en\">"));
        assert!(html.contains(messages::WELCOME));
        assert!(html.contains("2 languages available"));
    }

    #[test]
    fn test_render_index_hindi() {
        let t = translator();
        let hindi = t.registry().resolve("hi").unwrap();
        let locales = t.registry().list_enabled();
        let html = render_index(&t.localizer(hindi), &locales);

        assert!(html.contains("<html lang=\"hi\">"));
        assert!(html.contains("शिक्षक पोर्टल में आपका स्वागत है"));
        assert!(html.contains("2 भाषाएँ उपलब्ध हैं"));
        // Untranslated strings fall back to English
        assert!(html.contains(messages::INTRO));
    }

    #[test]
    fn test_switcher_lists_locales_and_marks_active() {
        let t = translator();
        let hindi = t.registry().resolve("hi").unwrap();
        let locales = t.registry().list_enabled();
        let html = render_switcher(&t.localizer(hindi), &locales);

        assert!(html.contains("href=\"/set_language/en\""));
        assert!(html.contains("href=\"/set_language/hi\""));
        assert!(html.contains("lang=\"hi\" aria-current=\"true\">🇮🇳 हिन्दी"));
        assert!(!html.contains("lang=\"en\" aria-current"));
    }
}
