//! Particle textures.
//!
//! Decoding image files is left to the host application; this module only
//! holds pixel data and the small lifecycle particles rely on (listeners for
//! updates, destruction).
//!
//! Every particle carries a [`Texture`]. When an effect has no art configured
//! it gets [`Texture::Empty`], a sentinel whose lifecycle operations do
//! nothing: subscribing, emitting and destroying are all no-ops, so shared
//! default textures can never be destroyed twice or leak listeners.
//!
//! ```
//! use plume::textures::{Texture, TextureData, TextureEvent};
//!
//! let empty = Texture::Empty;
//! empty.destroy();
//! assert!(!empty.is_destroyed());
//!
//! let tex = Texture::new(TextureData::solid(255, 0, 0, 255));
//! tex.destroy();
//! assert!(tex.is_destroyed());
//! ```

use crate::error::TextureError;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// Filter mode for texture sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Smooth linear filtering (default). Good for soft sprites.
    #[default]
    Linear,
    /// Sharp nearest-neighbor filtering. Good for pixel art.
    Nearest,
}

/// RGBA8 pixels for one particle texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureData {
    /// Raw RGBA pixel data (width * height * 4 bytes).
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub filter: FilterMode,
}

impl TextureData {
    /// Wrap raw RGBA data, checking its size.
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Result<Self, TextureError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(TextureError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            filter: FilterMode::Linear,
        })
    }

    /// A 1x1 texture of one color.
    pub fn solid(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            data: vec![r, g, b, a],
            width: 1,
            height: 1,
            filter: FilterMode::Nearest,
        }
    }

    /// A soft round sprite: opaque white at the center, fading to transparent
    /// at the edge.
    pub fn soft_circle(size: u32) -> Self {
        let mut data = Vec::with_capacity((size * size * 4) as usize);
        let half = size as f32 / 2.0;
        for y in 0..size {
            for x in 0..size {
                let dx = (x as f32 + 0.5 - half) / half;
                let dy = (y as f32 + 0.5 - half) / half;
                let falloff = (1.0 - (dx * dx + dy * dy).sqrt()).clamp(0.0, 1.0);
                data.extend_from_slice(&[255, 255, 255, (falloff * 255.0).round() as u8]);
            }
        }
        Self {
            data,
            width: size,
            height: size,
            filter: FilterMode::Linear,
        }
    }

    pub fn with_filter(mut self, filter: FilterMode) -> Self {
        self.filter = filter;
        self
    }
}

/// Lifecycle events a texture reports to its listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureEvent {
    /// Pixel data changed.
    Update,
    /// The texture was destroyed; it will not fire again.
    Destroy,
}

type Listener = Box<dyn FnMut(TextureEvent) + Send>;

struct Lifecycle {
    listeners: Vec<(TextureEvent, Listener)>,
    destroyed: bool,
}

/// Shared state behind a loaded texture.
pub struct LoadedTexture {
    data: TextureData,
    lifecycle: Mutex<Lifecycle>,
}

impl LoadedTexture {
    fn lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        // A panicking listener must not wedge the texture.
        self.lifecycle.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// A cheaply cloneable texture handle.
#[derive(Clone, Default)]
pub enum Texture {
    /// No art configured. Every lifecycle operation is a no-op.
    #[default]
    Empty,
    Loaded(Arc<LoadedTexture>),
}

impl Texture {
    pub fn new(data: TextureData) -> Self {
        Texture::Loaded(Arc::new(LoadedTexture {
            data,
            lifecycle: Mutex::new(Lifecycle {
                listeners: Vec::new(),
                destroyed: false,
            }),
        }))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Texture::Empty)
    }

    /// Pixel data, if any.
    pub fn data(&self) -> Option<&TextureData> {
        match self {
            Texture::Empty => None,
            Texture::Loaded(tex) => Some(&tex.data),
        }
    }

    /// Subscribe to `event`. Ignored on empty or destroyed textures.
    pub fn on(&self, event: TextureEvent, listener: impl FnMut(TextureEvent) + Send + 'static) {
        let Texture::Loaded(tex) = self else {
            return;
        };
        let mut lifecycle = tex.lifecycle();
        if !lifecycle.destroyed {
            lifecycle.listeners.push((event, Box::new(listener)));
        }
    }

    /// Notify listeners of `event`. Ignored on empty or destroyed textures.
    ///
    /// Listeners run without the lifecycle lock held, so they may subscribe,
    /// emit, or destroy the texture themselves. Listeners added while an
    /// event is being dispatched first hear the next one.
    pub fn emit(&self, event: TextureEvent) {
        let Texture::Loaded(tex) = self else {
            return;
        };
        let mut listeners = {
            let mut lifecycle = tex.lifecycle();
            if lifecycle.destroyed {
                return;
            }
            std::mem::take(&mut lifecycle.listeners)
        };
        for (wanted, listener) in listeners.iter_mut() {
            if *wanted == event {
                listener(event);
            }
        }

        let mut lifecycle = tex.lifecycle();
        if lifecycle.destroyed {
            // Destroyed by one of the listeners above; those still held here
            // have not heard about it yet.
            drop(lifecycle);
            fire_destroy(listeners);
            return;
        }
        let added = std::mem::replace(&mut lifecycle.listeners, listeners);
        lifecycle.listeners.extend(added);
    }

    /// Destroy the texture: fire [`TextureEvent::Destroy`] once, then drop
    /// every listener. Destroying again, or destroying an empty texture,
    /// does nothing.
    pub fn destroy(&self) {
        let Texture::Loaded(tex) = self else {
            return;
        };
        let listeners = {
            let mut lifecycle = tex.lifecycle();
            if lifecycle.destroyed {
                return;
            }
            lifecycle.destroyed = true;
            std::mem::take(&mut lifecycle.listeners)
        };
        fire_destroy(listeners);
        log::trace!("texture {}x{} destroyed", tex.data.width, tex.data.height);
    }

    pub fn is_destroyed(&self) -> bool {
        match self {
            Texture::Empty => false,
            Texture::Loaded(tex) => tex.lifecycle().destroyed,
        }
    }
}

fn fire_destroy(listeners: Vec<(TextureEvent, Listener)>) {
    for (wanted, mut listener) in listeners {
        if wanted == TextureEvent::Destroy {
            listener(TextureEvent::Destroy);
        }
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Texture::Empty => f.write_str("Texture::Empty"),
            Texture::Loaded(tex) => f
                .debug_struct("Texture::Loaded")
                .field("width", &tex.data.width)
                .field("height", &tex.data.height)
                .field("destroyed", &tex.lifecycle().destroyed)
                .finish(),
        }
    }
}

impl PartialEq for Texture {
    /// Handles are equal when they share the same texture.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Texture::Empty, Texture::Empty) => true,
            (Texture::Loaded(a), Texture::Loaded(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_from_rgba_checks_size() {
        assert!(TextureData::from_rgba(vec![0; 16], 2, 2).is_ok());
        assert_eq!(
            TextureData::from_rgba(vec![0; 15], 2, 2),
            Err(TextureError::SizeMismatch { expected: 16, actual: 15 })
        );
    }

    #[test]
    fn test_empty_texture_is_inert() {
        let empty = Texture::default();
        assert!(empty.is_empty());
        assert!(empty.data().is_none());
        empty.on(TextureEvent::Update, |_| panic!("empty texture fired a listener"));
        empty.emit(TextureEvent::Update);
        empty.destroy();
        empty.destroy();
        assert!(!empty.is_destroyed());
    }

    #[test]
    fn test_listeners_fire_for_their_event() {
        let updates = Arc::new(AtomicUsize::new(0));
        let tex = Texture::new(TextureData::solid(1, 2, 3, 4));
        let counter = Arc::clone(&updates);
        tex.on(TextureEvent::Update, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        tex.emit(TextureEvent::Update);
        tex.emit(TextureEvent::Destroy);
        tex.emit(TextureEvent::Update);
        assert_eq!(updates.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_double_destroy_fires_once() {
        let destroyed = Arc::new(AtomicUsize::new(0));
        let tex = Texture::new(TextureData::soft_circle(4));
        let shared = tex.clone();
        let counter = Arc::clone(&destroyed);
        tex.on(TextureEvent::Destroy, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        tex.destroy();
        shared.destroy();
        assert_eq!(destroyed.load(Ordering::SeqCst), 1);
        assert!(shared.is_destroyed());

        // Late subscribers are ignored.
        tex.on(TextureEvent::Update, |_| panic!("destroyed texture fired a listener"));
        tex.emit(TextureEvent::Update);
    }

    #[test]
    fn test_listener_can_use_its_texture() {
        let calls = Arc::new(AtomicUsize::new(0));
        let tex = Texture::new(TextureData::solid(9, 9, 9, 255));

        let inner = tex.clone();
        let counter = Arc::clone(&calls);
        tex.on(TextureEvent::Update, move |_| {
            assert!(!inner.is_destroyed());
            let _ = format!("{inner:?}");
            let nested = Arc::clone(&counter);
            inner.on(TextureEvent::Update, move |_| {
                nested.fetch_add(100, Ordering::SeqCst);
            });
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tex.emit(TextureEvent::Update);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // The listener subscribed during the first emit hears the second.
        tex.emit(TextureEvent::Update);
        assert_eq!(calls.load(Ordering::SeqCst), 102);
    }

    #[test]
    fn test_listener_can_destroy_its_texture() {
        let destroyed = Arc::new(AtomicUsize::new(0));
        let tex = Texture::new(TextureData::solid(0, 0, 0, 0));

        let counter = Arc::clone(&destroyed);
        tex.on(TextureEvent::Destroy, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let inner = tex.clone();
        tex.on(TextureEvent::Update, move |_| inner.destroy());

        tex.emit(TextureEvent::Update);
        assert!(tex.is_destroyed());
        assert_eq!(destroyed.load(Ordering::SeqCst), 1);
        tex.emit(TextureEvent::Update);
        tex.destroy();
        assert_eq!(destroyed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_soft_circle_falloff() {
        let tex = TextureData::soft_circle(8);
        assert_eq!(tex.data.len(), 8 * 8 * 4);
        let alpha = |x: usize, y: usize| tex.data[(y * 8 + x) * 4 + 3];
        assert!(alpha(4, 4) > 200);
        assert_eq!(alpha(0, 0), 0);
    }

    #[test]
    fn test_handles_compare_by_identity() {
        let a = Texture::new(TextureData::solid(0, 0, 0, 255));
        let b = Texture::new(TextureData::solid(0, 0, 0, 255));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(Texture::Empty, Texture::Empty);
    }
}
