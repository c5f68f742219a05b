//! =============================================================================
//! MACOS.RS - Implémentation macOS du Color Picker
//! =============================================================================
//!
//! Ce module présente le NSColorPanel partagé d'AppKit.
//! This module presents AppKit's shared NSColorPanel.
//!
//! # Architecture
//! - PanelObserver: objet Objective-C cible de l'action et délégué du panneau
//! - PanelObserver: Objective-C object, action target and panel delegate
//!
//! # Flux d'exécution / Execution flow
//! 1. present() configure le panneau et l'affiche
//! 2. Chaque changement de couleur appelle colorChanged:
//! 3. À la fermeture (windowWillClose:), la couleur est rapportée si elle a
//!    changé, sinon le panneau est considéré comme annulé
//! 1. present() configures the panel and shows it
//! 2. Every color change calls colorChanged:
//! 3. On close (windowWillClose:), the color is reported if it changed,
//!    otherwise the panel counts as dismissed

// Some AppKit setters are safe in recent objc2-app-kit releases
#![allow(unused_unsafe)]

use std::cell::{Cell, RefCell};

use objc2::rc::Retained;
use objc2::runtime::{AnyObject, ProtocolObject};
use objc2::{define_class, msg_send, sel, DefinedClass, MainThreadOnly};
use objc2_app_kit::{NSColor, NSColorPanel, NSColorSpace, NSWindowDelegate};
use objc2_foundation::{MainThreadMarker, NSNotification, NSObject, NSObjectProtocol, NSString};
use tracing::debug;

use super::common::ColorResult;
use super::Presenter;
use crate::color::ColorObject;
use crate::controller::OutcomeReporter;
use crate::error::PresentError;
use crate::options::{ColorFormat, PickerConfiguration};

// =============================================================================
// OBSERVATEUR DU PANNEAU
// PANEL OBSERVER
// =============================================================================

/// État porté par l'observateur
/// State carried by the observer
struct ObserverIvars {
    /// Rapporteur de la session, vidé au premier rapport
    /// Session reporter, emptied on first report
    reporter: RefCell<Option<OutcomeReporter>>,
    /// L'utilisateur a touché à la couleur
    /// The user touched the color
    changed: Cell<bool>,
    format: Cell<ColorFormat>,
}

define_class!(
    // SAFETY:
    // - The superclass NSObject does not have any subclassing requirements.
    // - PanelObserver does not implement Drop.
    #[unsafe(super(NSObject))]
    #[thread_kind = MainThreadOnly]
    #[name = "NativeColorPickerPanelObserver"]
    #[ivars = ObserverIvars]
    struct PanelObserver;

    impl PanelObserver {
        /// Action du panneau, appelée à chaque changement de couleur
        /// Panel action, called on every color change
        #[unsafe(method(colorChanged:))]
        fn color_changed(&self, _sender: Option<&AnyObject>) {
            self.ivars().changed.set(true);
        }
    }

    unsafe impl NSObjectProtocol for PanelObserver {}

    unsafe impl NSWindowDelegate for PanelObserver {
        #[unsafe(method(windowWillClose:))]
        fn window_will_close(&self, _notification: &NSNotification) {
            self.finish();
        }
    }
);

impl PanelObserver {
    fn new(mtm: MainThreadMarker, reporter: OutcomeReporter, format: ColorFormat) -> Retained<Self> {
        let this = mtm.alloc::<Self>().set_ivars(ObserverIvars {
            reporter: RefCell::new(Some(reporter)),
            changed: Cell::new(false),
            format: Cell::new(format),
        });
        unsafe { msg_send![super(this), init] }
    }

    /// Rapporte l'issue de la session à la fermeture du panneau
    /// Reports the session outcome when the panel closes
    fn finish(&self) {
        let reporter = self.ivars().reporter.borrow_mut().take();
        let Some(reporter) = reporter else {
            return;
        };

        if !self.ivars().changed.get() {
            reporter.dismissed();
            return;
        }

        let panel = unsafe { NSColorPanel::sharedColorPanel(self.mtm()) };
        let color = unsafe { panel.color() };
        match read_color(&color) {
            Some(color) => reporter.selected(ColorResult::from_components(color, self.ivars().format.get())),
            None => reporter.failed("color panel color has no sRGB representation"),
        }
    }
}

// =============================================================================
// PRESENTER
// =============================================================================

/// Presenter basé sur le NSColorPanel partagé
/// Presenter backed by the shared NSColorPanel
pub struct ColorPanelPresenter {
    mtm: MainThreadMarker,
    /// Observateur de la dernière session, retenu tant que le panneau le référence
    /// Observer of the last session, retained while the panel references it
    observer: Option<Retained<PanelObserver>>,
}

impl ColorPanelPresenter {
    /// Doit être appelé depuis le thread principal
    /// Must be called from the main thread
    pub fn new() -> Result<Self, PresentError> {
        let mtm = MainThreadMarker::new()
            .ok_or_else(|| PresentError::Platform("NSColorPanel must be used from the main thread".to_string()))?;
        Ok(Self { mtm, observer: None })
    }
}

impl Presenter for ColorPanelPresenter {
    fn present(&mut self, config: &PickerConfiguration, reporter: OutcomeReporter) -> Result<(), PresentError> {
        let panel = unsafe { NSColorPanel::sharedColorPanel(self.mtm) };
        let observer = PanelObserver::new(self.mtm, reporter, config.format());
        let initial = to_ns_color(config.initial_color());
        let target: &AnyObject = &observer;

        unsafe {
            panel.setShowsAlpha(config.supports_alpha());
            panel.setColor(&initial);
            panel.setTitle(&NSString::from_str(config.title()));
            panel.setContinuous(true);
            panel.setTarget(Some(target));
            panel.setAction(Some(sel!(colorChanged:)));
            panel.setDelegate(Some(ProtocolObject::from_ref(&*observer)));
            panel.makeKeyAndOrderFront(None);
        }

        // L'ancien observateur n'est plus délégué, on peut le libérer
        // The previous observer is no longer the delegate, it can be released
        self.observer = Some(observer);
        Ok(())
    }

    fn hide(&mut self) {
        let panel = unsafe { NSColorPanel::sharedColorPanel(self.mtm) };

        // Détache l'observateur avant de fermer pour ne rien rapporter
        // Detach the observer before closing so nothing gets reported
        unsafe {
            panel.setDelegate(None);
            panel.setTarget(None);
            panel.orderOut(None);
        }
        debug!("color panel hidden");
        self.observer = None;
    }
}

// =============================================================================
// CONVERSIONS NSColor
// NSColor CONVERSIONS
// =============================================================================

/// Crée une NSColor sRGB
/// Creates an sRGB NSColor
fn to_ns_color(color: ColorObject) -> Retained<NSColor> {
    let channel = |value: u8| f64::from(value) / 255.0;
    unsafe {
        NSColor::colorWithSRGBRed_green_blue_alpha(
            channel(color.r),
            channel(color.g),
            channel(color.b),
            f64::from(color.a),
        )
    }
}

/// Lit les composantes sRGB d'une NSColor
/// Reads the sRGB components of an NSColor
fn read_color(color: &NSColor) -> Option<ColorObject> {
    let srgb = unsafe { NSColorSpace::sRGBColorSpace() };
    let converted = unsafe { color.colorUsingColorSpace(&srgb) }?;
    let channel = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;

    unsafe {
        Some(ColorObject::rgba(
            channel(converted.redComponent()),
            channel(converted.greenComponent()),
            channel(converted.blueComponent()),
            converted.alphaComponent() as f32,
        ))
    }
}
