//! Technology name → icon URL lookup

use std::collections::HashMap;

const DEVICON_BASE: &str = "https://raw.githubusercontent.com/devicons/devicon/master/icons";

// (technology, devicon path under DEVICON_BASE)
const BUILTIN_ICONS: [(&str, &str); 10] = [
    ("React", "react/react-original.svg"),
    ("Angular", "angularjs/angularjs-original.svg"),
    ("Vue", "vuejs/vuejs-original.svg"),
    ("Bootstrap", "bootstrap/bootstrap-original.svg"),
    ("Tailwind", "tailwindcss/tailwindcss-plain.svg"),
    ("jQuery", "jquery/jquery-original.svg"),
    ("Node.js", "nodejs/nodejs-original.svg"),
    ("Python", "python/python-original.svg"),
    ("Django", "django/django-plain.svg"),
    ("Next.js", "nextjs/nextjs-original.svg"),
];

/// Icon table; names are matched exactly
#[derive(Debug, Clone, Default)]
pub struct IconTable {
    icons: HashMap<String, String>,
}

impl IconTable {
    /// The fixed set of well-known technologies
    pub fn builtin() -> Self {
        let icons = BUILTIN_ICONS
            .iter()
            .map(|(name, path)| (name.to_string(), format!("{}/{}", DEVICON_BASE, path)))
            .collect();
        Self { icons }
    }

    pub fn get(&self, technology: &str) -> Option<&str> {
        self.icons.get(technology).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_icons() {
        let icons = IconTable::builtin();
        assert_eq!(icons.len(), 10);
        assert_eq!(
            icons.get("React"),
            Some("https://raw.githubusercontent.com/devicons/devicon/master/icons/react/react-original.svg")
        );
        assert_eq!(
            icons.get("Tailwind"),
            Some("https://raw.githubusercontent.com/devicons/devicon/master/icons/tailwindcss/tailwindcss-plain.svg")
        );
        assert!(icons.get("react").is_none());
        assert!(icons.get("WordPress").is_none());
    }
}
