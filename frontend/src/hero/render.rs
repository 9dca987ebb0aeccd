//! Maps expansion progress to concrete style values.

pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceClass {
    Mobile,
    Desktop,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizeTable {
    pub initial_width: f64,
    pub initial_height: f64,
    pub max_width: f64,
    pub max_height: f64,
}

const DESKTOP_SIZES: SizeTable = SizeTable {
    initial_width: 300.0,
    initial_height: 400.0,
    max_width: 1550.0,
    max_height: 800.0,
};

const MOBILE_SIZES: SizeTable = SizeTable {
    initial_width: 300.0,
    initial_height: 400.0,
    max_width: 950.0,
    max_height: 600.0,
};

impl DeviceClass {
    pub fn from_viewport_width(width: f64) -> Self {
        if width < MOBILE_BREAKPOINT_PX {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }

    pub fn sizes(self) -> SizeTable {
        match self {
            DeviceClass::Mobile => MOBILE_SIZES,
            DeviceClass::Desktop => DESKTOP_SIZES,
        }
    }

    /// How far (in `vw`) the title halves travel at full expansion.
    pub fn text_travel_vw(self) -> f64 {
        match self {
            DeviceClass::Mobile => 180.0,
            DeviceClass::Desktop => 150.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderFrame {
    pub media_width: f64,
    pub media_height: f64,
    pub background_opacity: f64,
    pub overlay_opacity: f64,
    pub text_shift_vw: f64,
    pub expanding: bool,
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + t * (to - from)
}

pub fn frame(progress: f64, device: DeviceClass) -> RenderFrame {
    let sizes = device.sizes();
    RenderFrame {
        media_width: lerp(sizes.initial_width, sizes.max_width, progress),
        media_height: lerp(sizes.initial_height, sizes.max_height, progress),
        background_opacity: 1.0 - progress,
        overlay_opacity: 0.5 - 0.3 * progress,
        text_shift_vw: progress * device.text_travel_vw(),
        expanding: progress > 0.0 && progress < 1.0,
    }
}

impl RenderFrame {
    pub fn width_px(&self) -> String {
        format!("{}px", self.media_width)
    }

    pub fn height_px(&self) -> String {
        format!("{}px", self.media_height)
    }

    /// Transform for elements sliding out to the left.
    pub fn leading_transform(&self) -> String {
        format!("translateX(-{}vw)", self.text_shift_vw)
    }

    /// Transform for elements sliding out to the right.
    pub fn trailing_transform(&self) -> String {
        format!("translateX({}vw)", self.text_shift_vw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoint_splits_devices() {
        assert_eq!(DeviceClass::from_viewport_width(767.0), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_viewport_width(768.0), DeviceClass::Desktop);
    }

    #[test]
    fn halfway_desktop_is_midpoint() {
        let f = frame(0.5, DeviceClass::Desktop);
        assert_eq!(f.media_width, 925.0);
        assert_eq!(f.media_height, 600.0);
        assert_eq!(f.background_opacity, 0.5);
        assert!((f.overlay_opacity - 0.35).abs() < 1e-12);
        assert_eq!(f.text_shift_vw, 75.0);
        assert!(f.expanding);
    }

    #[test]
    fn endpoints_match_size_tables() {
        let start = frame(0.0, DeviceClass::Mobile);
        assert_eq!((start.media_width, start.media_height), (300.0, 400.0));
        assert!(!start.expanding);

        let end = frame(1.0, DeviceClass::Mobile);
        assert_eq!((end.media_width, end.media_height), (950.0, 600.0));
        assert_eq!(end.background_opacity, 0.0);
        assert!((end.overlay_opacity - 0.2).abs() < 1e-12);
        assert_eq!(end.text_shift_vw, 180.0);
        assert!(!end.expanding);
    }

    #[test]
    fn same_inputs_same_frame() {
        for p in [0.0, 0.13, 0.5, 0.99, 1.0] {
            for device in [DeviceClass::Mobile, DeviceClass::Desktop] {
                assert_eq!(frame(p, device), frame(p, device));
            }
        }
    }

    #[test]
    fn paired_text_moves_in_opposite_directions() {
        let f = frame(0.5, DeviceClass::Desktop);
        assert_eq!(f.leading_transform(), "translateX(-75vw)");
        assert_eq!(f.trailing_transform(), "translateX(75vw)");
        assert_eq!(f.width_px(), "925px");
    }
}
