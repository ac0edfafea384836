use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

pub struct ThemeColors {
    pub outline: Srgba<f64>,
    pub label: Srgba<f64>,
    pub pending: Srgba<f64>,
    pub showcase: Srgba<f64>,
    pub hint: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            outline: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.0, 0.0, 0.0, 1.0),
                None,
            ),
            label: Self::lookup_color(
                context,
                "theme_text_color",
                Srgba::new(0.1, 0.1, 0.1, 1.0),
                None,
            ),
            // orange unless the theme defines one
            pending: Self::lookup_color(
                context,
                "warning_color",
                Srgba::new(1.0, 0.65, 0.0, 1.0),
                Some(1.0),
            ),
            showcase: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                Srgba::new(0.2, 0.4, 0.8, 1.0),
                Some(1.0),
            ),
            hint: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.0, 0.0, 0.0, 0.25),
                Some(0.25),
            ),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.vantage-prompt {
    font-size: 1.15em;
}
.vantage-status {
    color: @error_color;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
