use crate::dom::{CalloutElement, attrs};
use crate::parsing::is_length;
use crate::persistence::CommandUpdate;

pub const MIN_WIDTH_PERCENT: f64 = 10.0;
pub const MAX_WIDTH_PERCENT: f64 = 100.0;
const FULL_WIDTH_PERCENT: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DragAbort {
    #[error("Width {0:?} is not a usable drag baseline")]
    MalformedBaseline(String),
    #[error("Container width must be a positive number")]
    NoContainer,
    #[error("No callout element with id {0}")]
    MissingElement(String),
}

/// `Idle -> Dragging -> Idle`. Pointer moves only touch the CSS property;
/// the durable width is handed back once, on release.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResizeDrag {
    #[default]
    Idle,
    Dragging {
        start_x: f64,
        baseline: f64,
        container_width: f64,
        current: Option<f64>,
    },
}

/// Reads the starting percentage from the width attribute.
///
/// No width means full width. A width in another unit cannot be converted
/// and also restarts from full width. A `%` value that is not a finite
/// number aborts the drag.
fn baseline_percent(raw: Option<&str>) -> Result<f64, DragAbort> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(FULL_WIDTH_PERCENT);
    };
    if let Some(number) = raw.strip_suffix('%') {
        return number
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| DragAbort::MalformedBaseline(raw.to_string()));
    }
    if is_length(raw) {
        return Ok(FULL_WIDTH_PERCENT);
    }
    Err(DragAbort::MalformedBaseline(raw.to_string()))
}

/// One decimal place, no trailing `.0`.
pub fn format_percent(value: f64) -> String {
    format!("{}%", (value * 10.0).round() / 10.0)
}

impl ResizeDrag {
    pub fn is_dragging(&self) -> bool {
        matches!(self, ResizeDrag::Dragging { .. })
    }

    /// Pointer down on the resize handle.
    pub fn begin(
        &mut self,
        element: &dyn CalloutElement,
        pointer_x: f64,
        container_width: f64,
    ) -> Result<(), DragAbort> {
        if !container_width.is_finite() || container_width <= 0.0 {
            return Err(DragAbort::NoContainer);
        }
        let baseline = baseline_percent(element.attr(attrs::WIDTH).as_deref())?;
        *self = ResizeDrag::Dragging {
            start_x: pointer_x,
            baseline,
            container_width,
            current: None,
        };
        Ok(())
    }

    /// Pointer move: writes the clamped width to the CSS property only.
    pub fn drag_to(&mut self, element: &mut dyn CalloutElement, pointer_x: f64) -> Option<f64> {
        let ResizeDrag::Dragging {
            start_x,
            baseline,
            container_width,
            current,
        } = self
        else {
            return None;
        };
        let width = *baseline + (pointer_x - *start_x) * 100.0 / *container_width;
        if !width.is_finite() {
            return None;
        }
        let width = width.clamp(MIN_WIDTH_PERCENT, MAX_WIDTH_PERCENT);
        element.set_style_property(attrs::css::WIDTH, &format_percent(width));
        *current = Some(width);
        Some(width)
    }

    /// Pointer up. Commits the final CSS value to the width attribute and
    /// returns the update to persist; `None` if the pointer never moved.
    pub fn finish(&mut self, element: &mut dyn CalloutElement) -> Option<CommandUpdate> {
        let ResizeDrag::Dragging {
            current: Some(current),
            ..
        } = std::mem::take(self)
        else {
            return None;
        };
        let width = element
            .style_property(attrs::css::WIDTH)
            .unwrap_or_else(|| format_percent(current));
        element.set_attr(attrs::WIDTH, &width);
        Some(CommandUpdate::width(width))
    }
}
