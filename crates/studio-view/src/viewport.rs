//! Recentering the diagram view on a node

use crate::config::ViewConfig;
use crate::render::{DiagramNodeKey, NodeGeometry, RenderTarget, ViewGeometry, ViewOffset};

/// View offset that puts the node's center at the configured anchor
///
/// With the default anchors the node's horizontal center lands at one third
/// of the visible width and its vertical center at half the visible height.
/// `zoom` is in percent.
pub fn recenter_offset(
    node: &NodeGeometry,
    view: &ViewGeometry,
    zoom: f64,
    config: &ViewConfig,
) -> ViewOffset {
    let zoom_factor = zoom / 100.0;
    let center_x = node.x + node.width / 2.0;
    let center_y = node.y + node.height / 2.0;

    ViewOffset {
        x: (view.left + view.visible_width * config.horizontal_anchor - center_x) * zoom_factor,
        y: (view.top + view.visible_height * config.vertical_anchor - center_y) * zoom_factor,
    }
}

/// Reset zoom to the baseline and pan the target so `key` is in view
///
/// Uses whatever geometry the target reports right now. Returns `None`,
/// leaving zoom and offset untouched, if the target has no geometry for
/// the node.
pub fn focus_node<R: RenderTarget>(
    target: &mut R,
    key: &DiagramNodeKey,
    config: &ViewConfig,
) -> Option<ViewOffset> {
    let geometry = target.node_geometry(key)?;
    target.set_zoom_level(config.baseline_zoom);
    let offset = recenter_offset(&geometry, &target.view_geometry(), target.zoom_level(), config);
    target.set_offset(offset);
    Some(offset)
}
