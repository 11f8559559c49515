//=========================================================================
// Device Registry
//=========================================================================
//
// Process-wide set of open device and resource records, one arena per
// kind, owned by the engine instead of living in global state.
//
// Architecture:
// ```text
//   DeviceRegistry
//     ├─ keyboards    DeviceArena<Keyboard>
//     ├─ mice         DeviceArena<Mouse>
//     ├─ controllers  DeviceArena<Controller>
//     ├─ windows      DeviceArena<Window>  ──owns──> textures, fonts
//     ├─ textures     DeviceArena<Texture>
//     ├─ fonts        DeviceArena<Font>
//     ├─ clocks       DeviceArena<Clock>
//     └─ animations   DeviceArena<Animation>
// ```
//
// Every kind implements `DeviceKind`, which routes the generic queries
// (`is_open`, `get`, `list`, `close`, ...) to the right arena.
//
//=========================================================================

//=== Submodules ==========================================================

mod arena;
mod handle;
mod ids;
mod resources;

//=== Re-exports ==========================================================

pub use arena::DeviceArena;
pub use handle::Handle;
pub use resources::{Font, Texture, Window};

//=== External Dependencies ===============================================

use log::{info, warn};

//=== Internal Dependencies ===============================================

use crate::core::animation::Animation;
use crate::core::clock::{Clock, ClockFormatError};
use crate::core::input::{Controller, Keyboard, Mouse};
use ids::IdSource;

//=== DeviceKind ==========================================================

/// A record kind stored in the [`DeviceRegistry`].
pub trait DeviceKind: Sized + 'static {
    /// Human-readable kind name used in diagnostics.
    const KIND: &'static str;

    fn arena(registry: &DeviceRegistry) -> &DeviceArena<Self>;

    fn arena_mut(registry: &mut DeviceRegistry) -> &mut DeviceArena<Self>;

    /// Runs after the record has left its arena.
    ///
    /// Used to cascade closes down the ownership tree and to unlink a
    /// record from its owner.
    fn released(_registry: &mut DeviceRegistry, _handle: Handle<Self>, _record: Self) {}
}

//=== DeviceRegistry ======================================================

/// Open records of every device and resource kind.
pub struct DeviceRegistry {
    ids: IdSource,
    next_stamp: u64,
    keyboards: DeviceArena<Keyboard>,
    mice: DeviceArena<Mouse>,
    controllers: DeviceArena<Controller>,
    windows: DeviceArena<Window>,
    textures: DeviceArena<Texture>,
    fonts: DeviceArena<Font>,
    clocks: DeviceArena<Clock>,
    animations: DeviceArena<Animation>,
}

impl DeviceRegistry {
    //--- Construction -----------------------------------------------------

    /// Empty registry with identifiers seeded from process entropy.
    pub fn new() -> Self {
        Self::from_ids(IdSource::from_entropy())
    }

    /// Empty registry with a deterministic identifier stream.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_ids(IdSource::seeded(seed))
    }

    fn from_ids(ids: IdSource) -> Self {
        Self {
            ids,
            next_stamp: 0,
            keyboards: DeviceArena::new(Keyboard::KIND),
            mice: DeviceArena::new(Mouse::KIND),
            controllers: DeviceArena::new(Controller::KIND),
            windows: DeviceArena::new(Window::KIND),
            textures: DeviceArena::new(Texture::KIND),
            fonts: DeviceArena::new(Font::KIND),
            clocks: DeviceArena::new(Clock::KIND),
            animations: DeviceArena::new(Animation::KIND),
        }
    }

    //--- Generic Queries --------------------------------------------------

    /// Arena holding every record of kind `D`.
    pub fn arena<D: DeviceKind>(&self) -> &DeviceArena<D> {
        D::arena(self)
    }

    pub fn is_open<D: DeviceKind>(&self, handle: Handle<D>) -> bool {
        D::arena(self).is_open(handle)
    }

    pub fn get<D: DeviceKind>(&self, handle: Handle<D>) -> Option<&D> {
        D::arena(self).get(handle)
    }

    pub fn get_mut<D: DeviceKind>(&mut self, handle: Handle<D>) -> Option<&mut D> {
        D::arena_mut(self).get_mut(handle)
    }

    /// Open records of kind `D`, oldest first.
    pub fn list<D: DeviceKind>(&self) -> Vec<Handle<D>> {
        D::arena(self).list()
    }

    pub fn count<D: DeviceKind>(&self) -> usize {
        D::arena(self).len()
    }

    /// Random identifier of an open record; `0` once closed.
    pub fn id<D: DeviceKind>(&self, handle: Handle<D>) -> u32 {
        D::arena(self).id(handle).unwrap_or_else(|| {
            warn!(target: "registry", "Id requested for closed {}", D::KIND);
            0
        })
    }

    //--- Creation ---------------------------------------------------------

    pub(crate) fn insert<D: DeviceKind>(&mut self, record: D) -> Handle<D> {
        let stamp = self.next_stamp;
        self.next_stamp += 1;

        let mut ids = self.ids.clone();
        let handle = D::arena_mut(self).insert(record, stamp, || ids.next_id());
        self.ids = ids;
        handle
    }

    /// Registers a platform window.
    pub fn create_window(
        &mut self,
        instance: u32,
        title: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Handle<Window> {
        if let Some(existing) = self.window_by_instance(instance) {
            panic!("window instance {} is already registered as {:?}", instance, existing);
        }
        let handle = self.insert(Window::new(instance, title, width, height));
        info!(target: "registry", "Window {} opened ({}x{})", instance, width, height);
        handle
    }

    /// Creates a texture owned by `window`. `None` if the window is closed.
    pub fn create_texture(
        &mut self,
        window: Handle<Window>,
        width: u32,
        height: u32,
    ) -> Option<Handle<Texture>> {
        if !self.windows.is_open(window) {
            warn!(target: "registry", "Texture requested for closed window");
            return None;
        }
        let handle = self.insert(Texture::new(window, width, height));
        self.windows.get_mut(window)?.textures.push(handle);
        Some(handle)
    }

    /// Creates a font owned by `window`. `None` if the window is closed.
    pub fn create_font(
        &mut self,
        window: Handle<Window>,
        name: impl Into<String>,
        point_size: f32,
    ) -> Option<Handle<Font>> {
        if !self.windows.is_open(window) {
            warn!(target: "registry", "Font requested for closed window");
            return None;
        }
        let handle = self.insert(Font::new(window, name, point_size));
        self.windows.get_mut(window)?.fonts.push(handle);
        Some(handle)
    }

    pub fn create_clock(&mut self, name: impl Into<String>) -> Handle<Clock> {
        self.insert(Clock::new(name))
    }

    /// Registers a clock restored from its binary form.
    pub fn load_clock(&mut self, bytes: &[u8]) -> Result<Handle<Clock>, ClockFormatError> {
        let clock = Clock::load(bytes)?;
        info!(target: "registry", "Clock '{}' loaded with {} timer(s)", clock.name(), clock.timer_count());
        Ok(self.insert(clock))
    }

    pub fn create_animation(&mut self, animation: Animation) -> Handle<Animation> {
        self.insert(animation)
    }

    //--- Lookup -----------------------------------------------------------

    /// Oldest open keyboard.
    pub fn primary_keyboard(&self) -> Option<Handle<Keyboard>> {
        self.keyboards.find(|_| true)
    }

    /// Oldest open mouse.
    pub fn primary_mouse(&self) -> Option<Handle<Mouse>> {
        self.mice.find(|_| true)
    }

    pub fn mouse_by_instance(&self, instance: u32) -> Option<Handle<Mouse>> {
        self.mice.find(|m| m.instance() == instance)
    }

    pub fn controller_by_instance(&self, instance: u32) -> Option<Handle<Controller>> {
        self.controllers.find(|c| c.instance() == instance)
    }

    pub fn window_by_instance(&self, instance: u32) -> Option<Handle<Window>> {
        self.windows.find(|w| w.instance() == instance)
    }

    //--- Closing ----------------------------------------------------------

    /// Closes the record behind `handle`.
    ///
    /// Closing an already-closed record logs a warning and returns `false`.
    pub fn close<D: DeviceKind>(&mut self, handle: Handle<D>) -> bool {
        match D::arena_mut(self).remove(handle) {
            Some(record) => {
                D::released(self, handle, record);
                true
            }
            None => {
                warn!(target: "registry", "Closing already closed {}", D::KIND);
                false
            }
        }
    }

    /// Closes every record in shutdown order: controllers, mice and
    /// keyboards, then windows (with their textures and fonts), then
    /// clocks and animations.
    ///
    /// # Panics
    ///
    /// Panics if any collection is still populated afterwards.
    pub fn close_all(&mut self) {
        self.close_every::<Controller>();
        self.close_every::<Mouse>();
        self.close_every::<Keyboard>();
        self.close_every::<Window>();
        self.close_every::<Clock>();
        self.close_every::<Animation>();

        self.assert_drained::<Keyboard>();
        self.assert_drained::<Mouse>();
        self.assert_drained::<Controller>();
        self.assert_drained::<Window>();
        self.assert_drained::<Texture>();
        self.assert_drained::<Font>();
        self.assert_drained::<Clock>();
        self.assert_drained::<Animation>();

        info!(target: "registry", "Registry closed");
    }

    fn close_every<D: DeviceKind>(&mut self) {
        for handle in self.list::<D>() {
            self.close(handle);
        }
    }

    fn assert_drained<D: DeviceKind>(&self) {
        let residue = self.count::<D>();
        assert!(residue == 0, "{} {} record(s) leaked at shutdown", residue, D::KIND);
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//=== DeviceKind Implementations ==========================================

impl DeviceKind for Keyboard {
    const KIND: &'static str = "keyboard";

    fn arena(registry: &DeviceRegistry) -> &DeviceArena<Self> {
        &registry.keyboards
    }

    fn arena_mut(registry: &mut DeviceRegistry) -> &mut DeviceArena<Self> {
        &mut registry.keyboards
    }
}

impl DeviceKind for Mouse {
    const KIND: &'static str = "mouse";

    fn arena(registry: &DeviceRegistry) -> &DeviceArena<Self> {
        &registry.mice
    }

    fn arena_mut(registry: &mut DeviceRegistry) -> &mut DeviceArena<Self> {
        &mut registry.mice
    }
}

impl DeviceKind for Controller {
    const KIND: &'static str = "controller";

    fn arena(registry: &DeviceRegistry) -> &DeviceArena<Self> {
        &registry.controllers
    }

    fn arena_mut(registry: &mut DeviceRegistry) -> &mut DeviceArena<Self> {
        &mut registry.controllers
    }
}

impl DeviceKind for Window {
    const KIND: &'static str = "window";

    fn arena(registry: &DeviceRegistry) -> &DeviceArena<Self> {
        &registry.windows
    }

    fn arena_mut(registry: &mut DeviceRegistry) -> &mut DeviceArena<Self> {
        &mut registry.windows
    }

    fn released(registry: &mut DeviceRegistry, _handle: Handle<Self>, window: Self) {
        let instance = window.instance();
        for texture in window.textures {
            registry.close(texture);
        }
        for font in window.fonts {
            registry.close(font);
        }
        info!(target: "registry", "Window {} closed", instance);
    }
}

impl DeviceKind for Texture {
    const KIND: &'static str = "texture";

    fn arena(registry: &DeviceRegistry) -> &DeviceArena<Self> {
        &registry.textures
    }

    fn arena_mut(registry: &mut DeviceRegistry) -> &mut DeviceArena<Self> {
        &mut registry.textures
    }

    fn released(registry: &mut DeviceRegistry, handle: Handle<Self>, texture: Self) {
        if let Some(window) = registry.windows.get_mut(texture.window()) {
            window.textures.retain(|t| *t != handle);
        }
    }
}

impl DeviceKind for Font {
    const KIND: &'static str = "font";

    fn arena(registry: &DeviceRegistry) -> &DeviceArena<Self> {
        &registry.fonts
    }

    fn arena_mut(registry: &mut DeviceRegistry) -> &mut DeviceArena<Self> {
        &mut registry.fonts
    }

    fn released(registry: &mut DeviceRegistry, handle: Handle<Self>, font: Self) {
        if let Some(window) = registry.windows.get_mut(font.window()) {
            window.fonts.retain(|f| *f != handle);
        }
    }
}

impl DeviceKind for Clock {
    const KIND: &'static str = "clock";

    fn arena(registry: &DeviceRegistry) -> &DeviceArena<Self> {
        &registry.clocks
    }

    fn arena_mut(registry: &mut DeviceRegistry) -> &mut DeviceArena<Self> {
        &mut registry.clocks
    }
}

impl DeviceKind for Animation {
    const KIND: &'static str = "animation";

    fn arena(registry: &DeviceRegistry) -> &DeviceArena<Self> {
        &registry.animations
    }

    fn arena_mut(registry: &mut DeviceRegistry) -> &mut DeviceArena<Self> {
        &mut registry.animations
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
