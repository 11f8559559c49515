//=========================================================================
// Window Resources
//=========================================================================
//
// Registry records for windows and the resources they own.
//
// Ownership is tree-shaped: a window lists its textures and fonts, and
// each of those points back at its window by handle only. Closing a
// window closes everything it lists before the window itself goes.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::handle::Handle;

//=== Window ==============================================================

/// Last known state of a platform window.
#[derive(Debug, Clone)]
pub struct Window {
    instance: u32,
    title: String,
    position: (i32, i32),
    size: (u32, u32),
    visible: bool,
    focused: bool,
    pub(crate) textures: Vec<Handle<Texture>>,
    pub(crate) fonts: Vec<Handle<Font>>,
}

impl Window {
    pub(crate) fn new(instance: u32, title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            instance,
            title: title.into(),
            position: (0, 0),
            size: (width, height),
            visible: true,
            focused: false,
            textures: Vec::new(),
            fonts: Vec::new(),
        }
    }

    /// Platform window id; raw events name windows by it.
    pub fn instance(&self) -> u32 {
        self.instance
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn position(&self) -> (i32, i32) {
        self.position
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Textures owned by this window, oldest first.
    pub fn textures(&self) -> &[Handle<Texture>] {
        &self.textures
    }

    /// Fonts owned by this window, oldest first.
    pub fn fonts(&self) -> &[Handle<Font>] {
        &self.fonts
    }

    pub(crate) fn set_position(&mut self, x: i32, y: i32) {
        self.position = (x, y);
    }

    pub(crate) fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub(crate) fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

//=== Texture =============================================================

/// Render target or image owned by a window.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    window: Handle<Window>,
    width: u32,
    height: u32,
}

impl Texture {
    pub(crate) fn new(window: Handle<Window>, width: u32, height: u32) -> Self {
        Self { window, width, height }
    }

    pub fn window(&self) -> Handle<Window> {
        self.window
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

//=== Font ================================================================

/// Loaded font face bound to a window's renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    window: Handle<Window>,
    name: String,
    point_size: f32,
}

impl Font {
    pub(crate) fn new(window: Handle<Window>, name: impl Into<String>, point_size: f32) -> Self {
        Self {
            window,
            name: name.into(),
            point_size,
        }
    }

    pub fn window(&self) -> Handle<Window> {
        self.window
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn point_size(&self) -> f32 {
        self.point_size
    }
}
