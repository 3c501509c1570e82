//! Responsive navigation menu.
//!
//! Wide viewports get a fixed horizontal bar. Narrow viewports collapse the
//! bar behind an icon that toggles a full-height overlay.

use crate::config::MenuConfig;

/// Which layout the viewport width selects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuMode {
    /// Below the breakpoint: collapsible overlay
    Narrow,
    /// At or above the breakpoint: always-visible bar
    Wide,
}

/// Horizontal alignment of menu items.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemFlow {
    /// One item per line, left-aligned
    Stacked,
    /// Items side by side, centered
    Inline,
}

impl ItemFlow {
    /// CSS `display` value for an item.
    pub fn display(&self) -> &'static str {
        match self {
            ItemFlow::Stacked => "block",
            ItemFlow::Inline => "inline-block",
        }
    }

    /// CSS `text-align` value for an item.
    pub fn text_align(&self) -> &'static str {
        match self {
            ItemFlow::Stacked => "left",
            ItemFlow::Inline => "center",
        }
    }
}

/// Style of the menu bar itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BarStyle {
    pub visible: bool,
    pub height: &'static str,
    pub padding_top: &'static str,
    pub text_align: Option<&'static str>,
    pub background: Option<&'static str>,
}

/// Everything a host needs to style the menu for one viewport width.
///
/// This is a platform-agnostic description; the `web` feature applies it
/// to the DOM.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuLayout {
    pub mode: MenuMode,
    pub body_padding_top: &'static str,
    pub items: ItemFlow,
    pub bar: BarStyle,
    /// Icon shown while the overlay is open (clicking it closes)
    pub close_icon_visible: bool,
    /// Icon shown while the overlay is closed (clicking it opens)
    pub open_icon_visible: bool,
}

/// Open/closed state of the navigation menu.
///
/// ```rust
/// use rand_text_core::{MenuConfig, MenuMode, NavMenu};
///
/// let mut menu = NavMenu::new(MenuConfig::default());
/// menu.open();
///
/// let layout = menu.layout(400);
/// assert_eq!(layout.mode, MenuMode::Narrow);
/// assert!(layout.bar.visible);
///
/// // Widening the window resets the overlay.
/// assert_eq!(menu.layout(1024).mode, MenuMode::Wide);
/// assert!(!menu.is_open());
/// ```
#[derive(Clone, Debug, Default)]
pub struct NavMenu {
    config: MenuConfig,
    open: bool,
}

impl NavMenu {
    pub fn new(config: MenuConfig) -> Self {
        Self { config, open: false }
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Escape pressed. Returns `true` if it closed the menu and the key
    /// press should be consumed.
    pub fn on_escape(&mut self) -> bool {
        if !self.open {
            return false;
        }
        self.open = false;
        true
    }

    pub fn mode(&self, viewport_width: u32) -> MenuMode {
        if viewport_width < self.config.breakpoint_px {
            MenuMode::Narrow
        } else {
            MenuMode::Wide
        }
    }

    /// Compute the layout for the given viewport width.
    ///
    /// A wide viewport forces the overlay closed, so shrinking the window
    /// again starts with the menu collapsed.
    pub fn layout(&mut self, viewport_width: u32) -> MenuLayout {
        match self.mode(viewport_width) {
            MenuMode::Narrow => {
                let bar = if self.open {
                    BarStyle {
                        visible: true,
                        height: "100%",
                        padding_top: "6em",
                        text_align: Some("left"),
                        background: Some("hsla(0, 0%, 0%, 85%)"),
                    }
                } else {
                    BarStyle {
                        visible: false,
                        height: "auto",
                        padding_top: "0",
                        text_align: None,
                        background: None,
                    }
                };
                MenuLayout {
                    mode: MenuMode::Narrow,
                    body_padding_top: "0",
                    items: ItemFlow::Stacked,
                    bar,
                    close_icon_visible: self.open,
                    open_icon_visible: !self.open,
                }
            }
            MenuMode::Wide => {
                if self.open {
                    log::debug!("menu overlay closed by wide viewport ({viewport_width}px)");
                }
                self.open = false;
                MenuLayout {
                    mode: MenuMode::Wide,
                    body_padding_top: "4em",
                    items: ItemFlow::Inline,
                    bar: BarStyle {
                        visible: true,
                        height: "auto",
                        padding_top: "0",
                        text_align: None,
                        background: Some("hsla(0, 0%, 0%, 100%)"),
                    },
                    close_icon_visible: false,
                    open_icon_visible: false,
                }
            }
        }
    }
}
