//! The render pipeline: plot specification in, scene graph out.
//!
//! Stages run in a fixed order: validate, facet, statistics per group,
//! discrete position resolution, position adjustment, scale training,
//! mapping, projection, and guide assembly. Configuration problems fail
//! before any data work; data problems downgrade to diagnostics.

use crate::adjust;
use crate::color::Rgba;
use crate::data::{split_by, DataFrame, DataValue};
use crate::error::{Diagnostic, DiagnosticKind, Diagnostics, Error, Result};
use crate::geometry::Rect;
use crate::grammar::aes::{Aes, CHANNELS};
use crate::grammar::coord::Coord;
use crate::grammar::facet::Facet;
use crate::grammar::geom::{GeomKind, LineType, PointShape};
use crate::grammar::plot::Plot;
use crate::grammar::position::PositionKind;
use crate::grammar::stat::{SmoothMethod, StatKind};
use crate::panel;
use crate::render::geoms::{self, MarkRow};
use crate::render::guide::{self, AxisSide};
use crate::render::scene::{
    LegendGuide, PanelGroup, Primitive, PrimitiveKind, SceneGraph, Strip, Style,
};
use crate::scale::{
    blue_gradient, hue_palette, linetype_palette, shape_palette, size_range, ContinuousScale,
    DiscreteScale, ScaleSpec,
};
use crate::stats;

/// Pixel layout constants for the figure chrome.
const AXIS_LEFT: f64 = 48.0;
const AXIS_BOTTOM: f64 = 36.0;
const TITLE_HEIGHT: f64 = 24.0;
const LEGEND_WIDTH: f64 = 110.0;
const PANEL_GAP: f64 = 8.0;
const STRIP_HEIGHT: f64 = 18.0;
const DISCRETE_EXPAND: f64 = 0.6;

/// A rendered plot: the scene plus everything the pipeline had to work
/// around in the data.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// Backend-neutral drawing instructions.
    pub scene: SceneGraph,
    /// Data problems encountered and recovered from.
    pub diagnostics: Vec<Diagnostic>,
}

/// Style channels resolved per row after the positional channels.
const STYLE_CHANNELS: &[&str] = &["color", "fill", "shape", "linetype", "size", "alpha", "label"];

/// Render a plot to a scene graph.
///
/// # Errors
///
/// Returns an error for configuration problems: no layers, unknown or
/// missing aesthetic columns, invalid statistic or position parameters,
/// missing facet variables, or zero output dimensions.
pub fn render(plot: &Plot) -> Result<RenderOutput> {
    validate(plot)?;
    let mut diag = Diagnostics::new();

    // Per-layer fixed context.
    let layers: Vec<LayerCtx> = plot
        .layers
        .iter()
        .map(|layer| {
            let aes = layer.aes.merged_over(&plot.aes);
            let data = layer.data.as_ref().unwrap_or(&plot.data);
            let group_cols = grouping_columns(&aes, data);
            let group_keys: Vec<String> = split_by(data, &group_cols)
                .into_iter()
                .map(|(k, _)| k)
                .collect();
            LayerCtx {
                geom: layer.geom.clone(),
                stat: layer.effective_stat(),
                position: layer.position,
                show_legend: layer.show_legend,
                aes,
                group_cols,
                group_keys,
            }
        })
        .collect();

    let panels = panel::assign(&plot.data, &plot.facet)?;
    let sharing = plot.facet.scales();
    crate::log::debug!(
        panels = panels.panels.len(),
        layers = layers.len(),
        "validated plot specification"
    );

    // Statistics, one run per (panel, layer, group).
    let mut frames: Vec<Vec<DataFrame>> = Vec::with_capacity(panels.panels.len());
    for pdef in &panels.panels {
        let mut per_layer = Vec::with_capacity(layers.len());
        for (li, ctx) in layers.iter().enumerate() {
            let layer_spec = &plot.layers[li];
            let data = layer_spec.data.as_ref().unwrap_or(&plot.data);
            let rows = layer_panel_rows(layer_spec.data.as_ref(), data, &plot.facet, pdef.index, &pdef.rows)?;
            per_layer.push(layer_frame(ctx, data, &rows, &mut diag));
        }
        frames.push(per_layer);
    }

    // Positional scale typing: discrete when any layer feeds text values.
    let x_discrete = axis_is_discrete(&frames, &["x", "xmin", "xmax", "xend"]);
    let y_discrete = axis_is_discrete(&frames, &["y", "ymin", "ymax", "yend"]);

    let n_scales = if sharing == crate::grammar::facet::ScaleSharing::Shared {
        1
    } else {
        panels.panels.len()
    };
    let x_shared = sharing.shares_x();
    let y_shared = sharing.shares_y();

    // Discrete level training runs before position adjustment so dodge
    // offsets see stable level indices.
    let mut x_levels = train_discrete_axis(
        &frames,
        &["x", "xmin", "xmax", "xend"],
        x_discrete,
        &plot.x_scale,
        x_shared,
        n_scales,
    );
    let mut y_levels = train_discrete_axis(
        &frames,
        &["y", "ymin", "ymax", "yend"],
        y_discrete,
        &plot.y_scale,
        y_shared,
        n_scales,
    );
    for set in [&mut x_levels, &mut y_levels].into_iter().flatten() {
        for s in set.iter_mut() {
            s.finish();
        }
    }

    for (pi, per_layer) in frames.iter_mut().enumerate() {
        for frame in per_layer.iter_mut() {
            if let Some(levels) = &x_levels {
                resolve_levels(frame, &["x", "xmin", "xmax", "xend"], pick(levels, pi, x_shared), &mut diag);
            }
            if let Some(levels) = &y_levels {
                resolve_levels(frame, &["y", "ymin", "ymax", "yend"], pick(levels, pi, y_shared), &mut diag);
            }
        }
    }

    // Bars and areas anchor to the data baseline before stacking.
    for per_layer in &mut frames {
        for (li, frame) in per_layer.iter_mut().enumerate() {
            prepare_intervals(&layers[li].geom, frame);
        }
    }

    // Position adjustment, then continuous training over the adjusted
    // extents (stacking can push domains outward).
    for per_layer in &mut frames {
        for (li, frame) in per_layer.iter_mut().enumerate() {
            *frame = adjust::apply(layers[li].position, frame);
        }
    }

    let x_spec = if x_discrete { ScaleSpec::default() } else { plot.x_scale.clone() };
    let y_spec = if y_discrete { ScaleSpec::default() } else { plot.y_scale.clone() };
    let mut x_cont = vec![x_spec.continuous(); n_scales];
    let mut y_cont = vec![y_spec.continuous(); n_scales];

    for (pi, per_layer) in frames.iter().enumerate() {
        for frame in per_layer {
            train_axis(pick_mut(&mut x_cont, pi, x_shared), frame, &["x", "xmin", "xmax", "xend"], "x", true, &mut diag);
            train_axis(pick_mut(&mut y_cont, pi, y_shared), frame, &["y", "ymin", "ymax", "yend", "lower", "middle", "upper"], "y", false, &mut diag);
        }
    }
    for s in &mut x_cont {
        if x_discrete {
            widen_discrete(s);
        }
        s.finish(if x_discrete { 0.0 } else { ContinuousScale::DEFAULT_EXPAND });
    }
    for s in &mut y_cont {
        if y_discrete {
            widen_discrete(s);
        }
        s.finish(if y_discrete { 0.0 } else { ContinuousScale::DEFAULT_EXPAND });
    }

    // Non-positional scales are always shared across panels.
    let channels = train_channels(&frames, &layers, &mut diag);

    // Mapping and projection.
    let flipped = plot.coord.is_flipped();
    let content = content_area(plot, &channels, &layers);
    let viewports = panel::viewports(
        content,
        panels.nrow,
        panels.ncol,
        PANEL_GAP,
        if matches!(plot.facet, Facet::None) { 0.0 } else { STRIP_HEIGHT },
    );

    let mut scene_panels = Vec::with_capacity(panels.panels.len());
    for (pi, pdef) in panels.panels.iter().enumerate() {
        let (strip_rect, viewport) = viewports[pdef.index];
        let xc = pick(&x_cont, pi, x_shared);
        let yc = pick(&y_cont, pi, y_shared);

        let mut layer_groups = Vec::with_capacity(layers.len());
        for (li, ctx) in layers.iter().enumerate() {
            let rows = mark_rows(&frames[pi][li], ctx, xc, yc, &channels, plot.missing_color, &mut diag);
            layer_groups.push(geoms::render(&ctx.geom, &rows, &plot.coord, viewport));
        }

        let x_breaks = axis_breaks(xc, pick_opt(&x_levels, pi, x_shared), &plot.x_scale);
        let y_breaks = axis_breaks(yc, pick_opt(&y_levels, pi, y_shared), &plot.y_scale);
        let (bottom_breaks, left_breaks) = if flipped {
            (y_breaks.clone(), x_breaks.clone())
        } else {
            (x_breaks.clone(), y_breaks.clone())
        };
        let (bottom_label, left_label) = if flipped {
            (plot.y_label(), plot.x_label())
        } else {
            (plot.x_label(), plot.y_label())
        };

        scene_panels.push(PanelGroup {
            viewport,
            strip: pdef.strip.clone().map(|label| Strip { label, rect: strip_rect }),
            backdrop: Some(plot.theme.panel_background),
            grid: grid_lines(&x_breaks, &y_breaks, &plot.theme, &plot.coord, viewport),
            x_axis: guide::axis(&bottom_label, &bottom_breaks, AxisSide::Bottom, viewport),
            y_axis: guide::axis(&left_label, &left_breaks, AxisSide::Left, viewport),
            layers: layer_groups,
            annotations: crate::render::annotate::render(&plot.annotations, xc, yc, &plot.coord, viewport),
        });
    }

    let scene = SceneGraph {
        width: plot.width,
        height: plot.height,
        background: plot.theme.background,
        title: plot.labels.title.clone(),
        panels: scene_panels,
        legends: legends(&channels, &layers),
    };

    let diagnostics = diag.into_entries();
    crate::log::debug!(
        primitives = scene.primitive_count(),
        diagnostics = diagnostics.len(),
        "assembled scene graph"
    );
    Ok(RenderOutput { scene, diagnostics })
}

// ---------------------------------------------------------------------
// Validation

fn validate(plot: &Plot) -> Result<()> {
    if plot.width == 0 || plot.height == 0 {
        return Err(Error::InvalidDimensions {
            width: f64::from(plot.width),
            height: f64::from(plot.height),
        });
    }
    if plot.layers.is_empty() {
        return Err(Error::NoLayers);
    }
    validate_coord(&plot.coord)?;
    if let Facet::Wrap { ncol: Some(0), .. } = plot.facet {
        return Err(invalid("facet_wrap", "ncol must be at least 1"));
    }

    for layer in &plot.layers {
        let aes = layer.aes.merged_over(&plot.aes);
        let data = layer.data.as_ref().unwrap_or(&plot.data);

        for (channel, column) in aes.mappings() {
            let Some(&known) = CHANNELS.iter().find(|&&c| c == channel) else {
                return Err(invalid("aes", &format!("unknown channel `{channel}`")));
            };
            if !data.has_column(column) {
                return Err(Error::UnknownColumn { column: column.clone(), channel: known });
            }
        }

        let stat = layer.effective_stat();
        validate_stat(&stat)?;
        validate_position(layer.position)?;

        for channel in required_channels(&layer.geom, &stat) {
            let satisfied = aes.mapping(channel).is_some()
                || (channel == "fill" && aes.fill_value.is_some());
            if !satisfied {
                return Err(Error::MissingAesthetic { geom: layer.geom.name(), channel });
            }
        }
    }
    Ok(())
}

/// Channels a layer must map before its statistic can run.
fn required_channels(geom: &GeomKind, stat: &StatKind) -> Vec<&'static str> {
    match stat {
        StatKind::Identity => geom.required_aes().to_vec(),
        StatKind::Count | StatKind::Bin(_) | StatKind::Density(_) | StatKind::Ecdf => vec!["x"],
        StatKind::Qq | StatKind::QqLine => vec!["y"],
        StatKind::Contour { .. } => vec!["x", "y", "z"],
        _ => vec!["x", "y"],
    }
}

fn invalid(context: &'static str, message: &str) -> Error {
    Error::InvalidParameter { context, message: message.to_string() }
}

fn validate_stat(stat: &StatKind) -> Result<()> {
    match stat {
        StatKind::Bin(p) => {
            if p.bins == 0 {
                return Err(invalid("bin", "bins must be at least 1"));
            }
            if let Some(w) = p.width {
                if !(w.is_finite() && w > 0.0) {
                    return Err(invalid("bin", "width must be positive"));
                }
            }
        }
        StatKind::Boxplot { coef } => {
            if !(coef.is_finite() && *coef >= 0.0) {
                return Err(invalid("boxplot", "coef must be non-negative"));
            }
        }
        StatKind::Smooth(p) => {
            if p.n < 2 {
                return Err(invalid("smooth", "n must be at least 2"));
            }
            if !(p.level > 0.0 && p.level < 1.0) {
                return Err(invalid("smooth", "level must be inside (0, 1)"));
            }
            if let SmoothMethod::Loess { span } = p.method {
                if !(span > 0.0 && span <= 1.0) {
                    return Err(invalid("smooth", "span must be inside (0, 1]"));
                }
            }
        }
        StatKind::Density(p) | StatKind::YDensity(p) => {
            if !(p.adjust.is_finite() && p.adjust > 0.0) {
                return Err(invalid("density", "adjust must be positive"));
            }
            if let Some(bw) = p.bandwidth {
                if !(bw.is_finite() && bw > 0.0) {
                    return Err(invalid("density", "bandwidth must be positive"));
                }
            }
        }
        StatKind::SummaryBin { bins, .. } => {
            if *bins == 0 {
                return Err(invalid("summary_bin", "bins must be at least 1"));
            }
        }
        StatKind::Density2d { n, levels } => {
            if *n < 2 || *levels == 0 {
                return Err(invalid("density_2d", "n and levels must be positive"));
            }
        }
        StatKind::Contour { levels } => {
            if *levels == 0 {
                return Err(invalid("contour", "levels must be at least 1"));
            }
        }
        StatKind::BinHex { bins } => {
            if *bins == 0 {
                return Err(invalid("bin_hex", "bins must be at least 1"));
            }
        }
        StatKind::Ellipse { level, segments } => {
            if !(*level > 0.0 && *level < 1.0) {
                return Err(invalid("ellipse", "level must be inside (0, 1)"));
            }
            if *segments < 3 {
                return Err(invalid("ellipse", "segments must be at least 3"));
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_position(position: PositionKind) -> Result<()> {
    match position {
        PositionKind::Dodge { width } => {
            if !(width.is_finite() && width > 0.0) {
                return Err(invalid("dodge", "width must be positive"));
            }
        }
        PositionKind::Dodge2 { padding } => {
            if !(0.0..1.0).contains(&padding) {
                return Err(invalid("dodge2", "padding must be inside [0, 1)"));
            }
        }
        PositionKind::Jitter { width, height, .. } => {
            for amount in [width, height].into_iter().flatten() {
                if !(amount.is_finite() && amount >= 0.0) {
                    return Err(invalid("jitter", "amounts must be non-negative"));
                }
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_coord(coord: &Coord) -> Result<()> {
    match coord {
        Coord::Fixed { ratio } => {
            if !(ratio.is_finite() && *ratio > 0.0) {
                return Err(invalid("coord_fixed", "ratio must be positive"));
            }
        }
        Coord::Polar { direction, .. } => {
            if *direction != 1 && *direction != -1 {
                return Err(invalid("coord_polar", "direction must be 1 or -1"));
            }
        }
        _ => {}
    }
    Ok(())
}

// ---------------------------------------------------------------------
// Statistics stage

struct LayerCtx {
    geom: GeomKind,
    stat: StatKind,
    position: PositionKind,
    show_legend: bool,
    aes: Aes,
    group_cols: Vec<String>,
    group_keys: Vec<String>,
}

/// Grouping columns: the explicit group mapping, otherwise the discrete
/// visual channels.
fn grouping_columns(aes: &Aes, data: &DataFrame) -> Vec<String> {
    if let Some(g) = aes.mapping("group") {
        return vec![g.to_string()];
    }
    aes.group_columns()
        .into_iter()
        .filter(|col| data.is_discrete(col))
        .collect()
}

/// Rows of a layer's data that belong to one panel.
///
/// Layers with their own data partition by the facet variables when they
/// carry them, and repeat across every panel when they do not.
fn layer_panel_rows(
    own_data: Option<&DataFrame>,
    data: &DataFrame,
    facet: &Facet,
    panel_index: usize,
    plot_panel_rows: &[usize],
) -> Result<Vec<usize>> {
    match own_data {
        None => Ok(plot_panel_rows.to_vec()),
        Some(df) => {
            let has_vars =
                !facet.variables().is_empty() && facet.variables().iter().all(|v| df.has_column(v));
            if has_vars {
                let set = panel::assign(df, facet)?;
                Ok(set
                    .panels
                    .get(panel_index)
                    .map(|p| p.rows.clone())
                    .unwrap_or_default())
            } else {
                Ok((0..df.nrow()).collect())
            }
        }
    }
}

/// Build the stat input for one group: mapped columns renamed to their
/// channels.
fn stat_input(data: &DataFrame, rows: &[usize], aes: &Aes) -> DataFrame {
    let sub = data.select_rows(rows);
    let mut out = DataFrame::new();
    for (channel, column) in aes.mappings() {
        if channel == "group" {
            continue;
        }
        if let Some(col) = sub.column(column) {
            out.add_column(channel, col.to_vec());
        }
    }
    out
}

/// Run the statistic per group and reassemble one frame for the layer,
/// with a numeric `group` column and the per-group style constants
/// re-attached.
fn layer_frame(ctx: &LayerCtx, data: &DataFrame, rows: &[usize], diag: &mut Diagnostics) -> DataFrame {
    let sub = data.select_rows(rows);
    let groups = split_by(&sub, &ctx.group_cols);

    let mut out = DataFrame::new();
    for (key, group_rows) in &groups {
        let global: Vec<usize> = group_rows.iter().map(|&r| rows[r]).collect();
        let input = stat_input(data, &global, &ctx.aes);
        let mut computed = stats::apply(&ctx.stat, &input, diag);
        if computed.nrow() == 0 {
            continue;
        }

        // Style channels that did not survive the statistic fall back to
        // the group's first value.
        for &channel in STYLE_CHANNELS {
            if ctx.aes.mapping(channel).is_some()
                && !computed.has_column(channel)
                && input.nrow() > 0
            {
                let constant = input.cell(0, channel);
                computed.add_column(channel, vec![constant; computed.nrow()]);
            }
        }

        let gid = ctx.group_keys.iter().position(|k| k == key).unwrap_or(0) as f64;
        computed.add_column_f64("group", &vec![gid; computed.nrow()]);
        out.append(&computed);
    }
    out
}

/// Give interval geometries their baseline and width columns before
/// stacking and dodging run.
fn prepare_intervals(geom: &GeomKind, frame: &mut DataFrame) {
    let default_width = match geom {
        GeomKind::Bar { width } => Some(*width),
        GeomKind::Boxplot { width } => Some(*width),
        _ => None,
    };
    if let Some(w) = default_width {
        if !frame.has_column("width") && frame.nrow() > 0 {
            frame.add_column_f64("width", &vec![w; frame.nrow()]);
        }
    }

    if matches!(geom, GeomKind::Bar { .. } | GeomKind::Area) && !frame.has_column("ymin") {
        let tops: Vec<DataValue> = (0..frame.nrow()).map(|r| frame.cell(r, "y")).collect();
        frame.add_column("ymin", vec![DataValue::Number(0.0); frame.nrow()]);
        frame.add_column("ymax", tops);
    }
}

// ---------------------------------------------------------------------
// Scale training

fn axis_is_discrete(frames: &[Vec<DataFrame>], columns: &[&str]) -> bool {
    frames.iter().flatten().any(|frame| {
        columns.iter().any(|col| frame.is_discrete(col))
    })
}

fn train_discrete_axis(
    frames: &[Vec<DataFrame>],
    columns: &[&str],
    discrete: bool,
    spec: &ScaleSpec,
    shared: bool,
    n_scales: usize,
) -> Option<Vec<DiscreteScale>> {
    if !discrete {
        return None;
    }
    let count = if shared { 1 } else { n_scales };
    let mut scales = vec![spec.discrete(); count];
    for (pi, per_layer) in frames.iter().enumerate() {
        let idx = if shared { 0 } else { pi.min(count - 1) };
        for frame in per_layer {
            for col in columns {
                if let Some(values) = frame.column(col) {
                    scales[idx].train(values);
                }
            }
        }
    }
    Some(scales)
}

/// Rewrite discrete positional cells as level indices, dropping rows whose
/// label is outside the trained level set.
fn resolve_levels(
    frame: &mut DataFrame,
    columns: &[&str],
    levels: &DiscreteScale,
    diag: &mut Diagnostics,
) {
    let mut unknown = 0usize;
    let mut keep: Vec<usize> = Vec::with_capacity(frame.nrow());

    for row in 0..frame.nrow() {
        let mut row_ok = true;
        for col in columns {
            let cell = frame.cell(row, col);
            if cell.is_null() || !frame.has_column(col) {
                continue;
            }
            if levels.index_of(&cell.label()).is_none() {
                row_ok = false;
            }
        }
        if row_ok {
            keep.push(row);
        } else {
            unknown += 1;
        }
    }
    if unknown > 0 {
        diag.push(
            DiagnosticKind::UnknownLevel,
            format!("dropped {unknown} row(s) with values outside the positional level set"),
            unknown,
        );
        *frame = frame.select_rows(&keep);
    }

    for col in columns {
        if !frame.has_column(col) {
            continue;
        }
        let converted: Vec<DataValue> = (0..frame.nrow())
            .map(|row| {
                let cell = frame.cell(row, col);
                if cell.is_null() {
                    return cell;
                }
                match levels.index_of(&cell.label()) {
                    Some(i) => DataValue::Number(i as f64),
                    None => DataValue::Null,
                }
            })
            .collect();
        frame.add_column(col, converted);
    }
}

fn pick<'a, T>(scales: &'a [T], panel: usize, shared: bool) -> &'a T {
    if shared {
        &scales[0]
    } else {
        &scales[panel]
    }
}

fn pick_mut<'a, T>(scales: &'a mut [T], panel: usize, shared: bool) -> &'a mut T {
    if shared {
        &mut scales[0]
    } else {
        &mut scales[panel]
    }
}

fn pick_opt<'a, T>(scales: &'a Option<Vec<T>>, panel: usize, shared: bool) -> Option<&'a T> {
    scales.as_ref().map(|s| pick(s, panel, shared))
}

/// Fold a frame's positional columns into a continuous scale, including
/// interval half-widths so bars never clip.
fn train_axis(
    scale: &mut ContinuousScale,
    frame: &DataFrame,
    columns: &[&str],
    context: &str,
    widths_apply: bool,
    diag: &mut Diagnostics,
) {
    for col in columns {
        if let Some(values) = frame.numeric(col) {
            let flat: Vec<f64> = values.into_iter().flatten().collect();
            scale.train(&flat, context, diag);
        }
    }
    if widths_apply && frame.has_column("width") {
        for row in 0..frame.nrow() {
            if let (Some(x), Some(w)) = (
                frame.cell(row, "x").as_f64(),
                frame.cell(row, "width").as_f64(),
            ) {
                scale.train(&[x - w / 2.0, x + w / 2.0], context, diag);
            }
        }
    }
}

/// Additive padding around a discrete axis so the outer level's marks
/// stay inside the panel.
fn widen_discrete(scale: &mut ContinuousScale) {
    if let Some((lo, hi)) = scale.domain() {
        scale.extend(lo - DISCRETE_EXPAND);
        scale.extend(hi + DISCRETE_EXPAND);
    } else {
        scale.extend(-DISCRETE_EXPAND);
        scale.extend(DISCRETE_EXPAND);
    }
}

/// A trained non-positional channel.
enum ChannelScale {
    Discrete(DiscreteScale),
    Continuous(ContinuousScale),
}

struct Channels {
    color: Option<(String, ChannelScale)>,
    fill: Option<(String, ChannelScale)>,
    shape: Option<(String, DiscreteScale)>,
    linetype: Option<(String, DiscreteScale)>,
    size: Option<(String, ContinuousScale)>,
    alpha: Option<(String, ContinuousScale)>,
}

fn train_channels(frames: &[Vec<DataFrame>], layers: &[LayerCtx], diag: &mut Diagnostics) -> Channels {
    let color = train_color_like(frames, layers, "color", diag);
    let fill = train_color_like(frames, layers, "fill", diag);
    let shape = train_label_channel(frames, layers, "shape");
    let linetype = train_label_channel(frames, layers, "linetype");
    let size = train_numeric_channel(frames, layers, "size", diag);
    let alpha = train_numeric_channel(frames, layers, "alpha", diag);
    Channels { color, fill, shape, linetype, size, alpha }
}

fn channel_title(layers: &[LayerCtx], channel: &str) -> Option<String> {
    layers
        .iter()
        .find_map(|l| l.aes.mapping(channel).map(str::to_string))
}

fn channel_is_discrete(frames: &[Vec<DataFrame>], channel: &str) -> bool {
    frames.iter().flatten().any(|f| f.is_discrete(channel))
}

fn train_color_like(
    frames: &[Vec<DataFrame>],
    layers: &[LayerCtx],
    channel: &str,
    diag: &mut Diagnostics,
) -> Option<(String, ChannelScale)> {
    let title = channel_title(layers, channel)?;
    if channel_is_discrete(frames, channel) {
        let mut scale = DiscreteScale::new();
        for frame in frames.iter().flatten() {
            if let Some(values) = frame.column(channel) {
                scale.train(values);
            }
        }
        scale.finish();
        Some((title, ChannelScale::Discrete(scale)))
    } else {
        let mut scale = ContinuousScale::new(crate::scale::Transform::Identity);
        for frame in frames.iter().flatten() {
            if let Some(values) = frame.numeric(channel) {
                let flat: Vec<f64> = values.into_iter().flatten().collect();
                scale.train(&flat, channel, diag);
            }
        }
        scale.finish(0.0);
        Some((title, ChannelScale::Continuous(scale)))
    }
}

fn train_label_channel(
    frames: &[Vec<DataFrame>],
    layers: &[LayerCtx],
    channel: &str,
) -> Option<(String, DiscreteScale)> {
    let title = channel_title(layers, channel)?;
    let mut scale = DiscreteScale::new();
    for frame in frames.iter().flatten() {
        if let Some(values) = frame.column(channel) {
            scale.train(values);
        }
    }
    scale.finish();
    Some((title, scale))
}

fn train_numeric_channel(
    frames: &[Vec<DataFrame>],
    layers: &[LayerCtx],
    channel: &str,
    diag: &mut Diagnostics,
) -> Option<(String, ContinuousScale)> {
    let title = channel_title(layers, channel)?;
    let mut scale = ContinuousScale::new(crate::scale::Transform::Identity);
    for frame in frames.iter().flatten() {
        if let Some(values) = frame.numeric(channel) {
            let flat: Vec<f64> = values.into_iter().flatten().collect();
            scale.train(&flat, channel, diag);
        }
    }
    scale.finish(0.0);
    Some((title, scale))
}

// ---------------------------------------------------------------------
// Mapping

fn map_cell(frame: &DataFrame, row: usize, col: &str, scale: &ContinuousScale) -> Option<f64> {
    frame.cell(row, col).as_f64().and_then(|v| scale.map(v))
}

/// Half-width of an interval in normalized units, measured through the
/// scale so transforms keep their shape.
fn normalized_extent(
    frame: &DataFrame,
    row: usize,
    center_col: &str,
    size_col: &str,
    scale: &ContinuousScale,
) -> Option<f64> {
    let center = frame.cell(row, center_col).as_f64()?;
    let size = frame.cell(row, size_col).as_f64()?;
    let lo = scale.map(center - size / 2.0)?;
    let hi = scale.map(center + size / 2.0)?;
    Some((hi - lo).abs())
}

#[allow(clippy::too_many_lines)]
fn mark_rows(
    frame: &DataFrame,
    ctx: &LayerCtx,
    xc: &ContinuousScale,
    yc: &ContinuousScale,
    channels: &Channels,
    missing_color: Rgba,
    diag: &mut Diagnostics,
) -> Vec<MarkRow> {
    let mut unknown_levels = 0usize;
    let mut out = Vec::with_capacity(frame.nrow());

    for row in 0..frame.nrow() {
        let mut mark = MarkRow {
            index: row,
            group: frame.cell(row, "group").as_f64().map_or(0, |g| g as i64),
            x: map_cell(frame, row, "x", xc),
            y: map_cell(frame, row, "y", yc),
            xmin: map_cell(frame, row, "xmin", xc),
            xmax: map_cell(frame, row, "xmax", xc),
            ymin: map_cell(frame, row, "ymin", yc),
            ymax: map_cell(frame, row, "ymax", yc),
            xend: map_cell(frame, row, "xend", xc),
            yend: map_cell(frame, row, "yend", yc),
            lower: map_cell(frame, row, "lower", yc),
            middle: map_cell(frame, row, "middle", yc),
            upper: map_cell(frame, row, "upper", yc),
            width: normalized_extent(frame, row, "x", "width", xc),
            height: normalized_extent(frame, row, "y", "height", yc),
            piece: frame.cell(row, "piece").as_f64().map(|p| p as i64),
            label: match frame.cell(row, "label") {
                DataValue::Null => None,
                other => Some(other.label()),
            },
            role: frame.cell(row, "role").as_str().map(str::to_string),
            ..MarkRow::default()
        };

        // Contour pieces must not merge across levels.
        if let (Some(piece), Some(level)) = (mark.piece, frame.cell(row, "level").as_f64()) {
            mark.piece = Some(piece + (level.to_bits() as i64).rem_euclid(1 << 20) * 1_000_003);
        }

        if let Some((_, scale)) = &channels.color {
            mark.color = resolve_color(frame, row, "color", scale, missing_color, &mut unknown_levels);
        } else if let Some(fixed) = ctx.aes.color_value {
            mark.color = fixed;
        }

        if let Some((_, scale)) = &channels.fill {
            mark.fill = resolve_color(frame, row, "fill", scale, missing_color, &mut unknown_levels);
        } else if let Some(fixed) = ctx.aes.fill_value {
            mark.fill = fixed;
        } else if ctx.aes.mapping("fill").is_none() && channels.color.is_some() {
            // Color-mapped layers without a fill mapping reuse the stroke
            // color for filled marks.
            mark.fill = mark.color;
        }

        if let Some((_, scale)) = &channels.shape {
            let label = frame.cell(row, "shape").label();
            mark.shape = scale.index_of(&label).map_or(PointShape::Circle, shape_palette);
        } else if let Some(fixed) = ctx.aes.shape_value {
            mark.shape = fixed;
        }

        if let Some((_, scale)) = &channels.linetype {
            let label = frame.cell(row, "linetype").label();
            mark.linetype = scale
                .index_of(&label)
                .map_or(LineType::Solid, linetype_palette);
        } else if let Some(fixed) = ctx.aes.linetype_value {
            mark.linetype = fixed;
        }

        if let Some((_, scale)) = &channels.size {
            if let Some(t) = map_cell(frame, row, "size", scale) {
                mark.size = size_range(t, 1.0, 6.0);
            }
        } else if let Some(fixed) = ctx.aes.size_value {
            mark.size = fixed;
        }

        if let Some((_, scale)) = &channels.alpha {
            if let Some(t) = map_cell(frame, row, "alpha", scale) {
                mark.alpha = 0.1 + 0.9 * t.clamp(0.0, 1.0);
            }
        } else if let Some(fixed) = ctx.aes.alpha_value {
            mark.alpha = fixed.clamp(0.0, 1.0);
        }

        out.push(mark);
    }

    if unknown_levels > 0 {
        diag.push(
            DiagnosticKind::UnknownLevel,
            format!(
                "{}: {unknown_levels} value(s) outside the scale domain drawn in the missing-value color",
                ctx.geom.name()
            ),
            unknown_levels,
        );
    }
    out
}

fn resolve_color(
    frame: &DataFrame,
    row: usize,
    channel: &str,
    scale: &ChannelScale,
    missing: Rgba,
    unknown: &mut usize,
) -> Rgba {
    let cell = frame.cell(row, channel);
    match scale {
        ChannelScale::Discrete(levels) => {
            if cell.is_null() {
                *unknown += 1;
                return missing;
            }
            match levels.index_of(&cell.label()) {
                Some(i) => hue_palette(levels.len())[i],
                None => {
                    *unknown += 1;
                    missing
                }
            }
        }
        ChannelScale::Continuous(cont) => match cell.as_f64().and_then(|v| cont.map(v)) {
            Some(t) => blue_gradient(t),
            None => {
                *unknown += 1;
                missing
            }
        },
    }
}

// ---------------------------------------------------------------------
// Guides and layout

fn axis_breaks(
    cont: &ContinuousScale,
    levels: Option<&DiscreteScale>,
    spec: &ScaleSpec,
) -> Vec<(f64, String)> {
    match levels {
        Some(levels) => levels
            .levels()
            .iter()
            .enumerate()
            .filter_map(|(i, label)| Some((cont.map(i as f64)?, label.clone())))
            .collect(),
        None => match &spec.breaks {
            Some(explicit) => cont.breaks_at(explicit),
            None => cont.breaks(5),
        },
    }
}

/// Grid lines run through the coordinate system, so they bend under polar
/// and swap under flip along with the data.
fn grid_lines(
    x_breaks: &[(f64, String)],
    y_breaks: &[(f64, String)],
    theme: &crate::grammar::theme::Theme,
    coord: &Coord,
    viewport: Rect,
) -> Vec<Primitive> {
    let Some(color) = theme.grid else { return Vec::new() };
    let style = Style {
        fill: None,
        stroke: Some(color),
        stroke_width: 1.0,
        linetype: LineType::Solid,
    };
    let steps = if coord.is_curved() { 48 } else { 1 };

    let mut out = Vec::new();
    let mut push_line = |fixed: f64, along_x: bool| {
        let points = (0..=steps)
            .map(|i| {
                let t = f64::from(i) / f64::from(steps);
                if along_x {
                    coord.project(t, fixed, viewport)
                } else {
                    coord.project(fixed, t, viewport)
                }
            })
            .collect();
        out.push(Primitive {
            index: out.len(),
            kind: PrimitiveKind::Polyline { points },
            style: style.clone(),
        });
    };

    for &(t, _) in x_breaks {
        if (0.0..=1.0).contains(&t) {
            push_line(t, false);
        }
    }
    for &(t, _) in y_breaks {
        if (0.0..=1.0).contains(&t) {
            push_line(t, true);
        }
    }
    out
}

fn content_area(plot: &Plot, channels: &Channels, layers: &[LayerCtx]) -> Rect {
    let margin = plot.theme.margin;
    let title = if plot.labels.title.is_some() { TITLE_HEIGHT } else { 0.0 };
    let legend = if legends(channels, layers).is_empty() { 0.0 } else { LEGEND_WIDTH };
    Rect::new(
        margin + AXIS_LEFT,
        margin + title,
        (f64::from(plot.width) - 2.0 * margin - AXIS_LEFT - legend).max(1.0),
        (f64::from(plot.height) - 2.0 * margin - AXIS_BOTTOM - title).max(1.0),
    )
}

fn legends(channels: &Channels, layers: &[LayerCtx]) -> Vec<LegendGuide> {
    let any_legend = layers.iter().any(|l| l.show_legend);
    if !any_legend {
        return Vec::new();
    }

    let mut raw = Vec::new();
    if let Some((title, scale)) = &channels.color {
        raw.push(match scale {
            ChannelScale::Discrete(s) => guide::discrete_color_legend(title, s),
            ChannelScale::Continuous(s) => guide::continuous_color_legend(title, s),
        });
    }
    if let Some((title, scale)) = &channels.fill {
        raw.push(match scale {
            ChannelScale::Discrete(s) => guide::discrete_color_legend(title, s),
            ChannelScale::Continuous(s) => guide::continuous_color_legend(title, s),
        });
    }
    if let Some((title, scale)) = &channels.shape {
        raw.push(guide::shape_legend(title, scale));
    }
    if let Some((title, scale)) = &channels.linetype {
        raw.push(guide::linetype_legend(title, scale));
    }
    guide::merge(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::layer::Layer;

    fn scatter_plot() -> Plot {
        let df = DataFrame::from_xy(&[1.0, 2.0, 3.0, 4.0], &[10.0, 20.0, 15.0, 30.0]);
        Plot::new(df)
            .aes(Aes::new().x("x").y("y"))
            .layer(Layer::new(GeomKind::Point))
    }

    #[test]
    fn test_scatter_renders_one_point_per_row() {
        let out = render(&scatter_plot()).unwrap();
        assert_eq!(out.scene.panels.len(), 1);
        let layer = out.scene.layer(0, "point").unwrap();
        assert_eq!(layer.primitives.len(), 4);
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_no_layers_errors() {
        let plot = Plot::new(DataFrame::new());
        assert!(matches!(render(&plot), Err(Error::NoLayers)));
    }

    #[test]
    fn test_unknown_column_errors() {
        let plot = Plot::new(DataFrame::from_xy(&[1.0], &[2.0]))
            .aes(Aes::new().x("x").y("nope"))
            .layer(Layer::new(GeomKind::Point));
        match render(&plot) {
            Err(Error::UnknownColumn { column, channel }) => {
                assert_eq!(column, "nope");
                assert_eq!(channel, "y");
            }
            other => panic!("expected UnknownColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_required_aesthetic_errors() {
        let plot = Plot::new(DataFrame::from_xy(&[1.0], &[2.0]))
            .aes(Aes::new().x("x"))
            .layer(Layer::new(GeomKind::Point));
        assert!(matches!(render(&plot), Err(Error::MissingAesthetic { .. })));
    }

    #[test]
    fn test_zero_dimensions_error() {
        let plot = scatter_plot().size(0, 600);
        assert!(matches!(render(&plot), Err(Error::InvalidDimensions { .. })));
    }

    #[test]
    fn test_invalid_stat_parameter_errors() {
        let plot = Plot::new(DataFrame::from_xy(&[1.0], &[2.0]))
            .aes(Aes::new().x("x"))
            .layer(Layer::new(GeomKind::bar()).stat(StatKind::bin(0)));
        assert!(matches!(render(&plot), Err(Error::InvalidParameter { .. })));
    }

    #[test]
    fn test_bar_count_discrete_axis() {
        let mut df = DataFrame::new();
        df.add_column_str("kind", &["a", "b", "a", "a", "b"]);
        let plot = Plot::new(df)
            .aes(Aes::new().x("kind"))
            .layer(Layer::new(GeomKind::bar()));
        let out = render(&plot).unwrap();
        let layer = out.scene.layer(0, "bar").unwrap();
        assert_eq!(layer.primitives.len(), 2);
        // Two level ticks on the x axis.
        assert_eq!(out.scene.panels[0].x_axis.ticks.len(), 2);
        assert_eq!(out.scene.panels[0].x_axis.ticks[0].label, "a");
    }

    #[test]
    fn test_facet_wrap_panel_count() {
        let mut df = DataFrame::from_xy(&[1.0, 2.0, 3.0, 4.0], &[1.0, 2.0, 3.0, 4.0]);
        df.add_column_str("g", &["a", "a", "b", "b"]);
        let plot = Plot::new(df)
            .aes(Aes::new().x("x").y("y"))
            .layer(Layer::new(GeomKind::Point))
            .facet(Facet::wrap("g"));
        let out = render(&plot).unwrap();
        assert_eq!(out.scene.panels.len(), 2);
        let total: usize = out
            .scene
            .panels
            .iter()
            .map(|p| p.layers[0].primitives.len())
            .sum();
        assert_eq!(total, 4);
        assert_eq!(out.scene.panels[0].strip.as_ref().unwrap().label, "a");
    }

    #[test]
    fn test_legend_emitted_for_discrete_color() {
        let mut df = DataFrame::from_xy(&[1.0, 2.0], &[1.0, 2.0]);
        df.add_column_str("grp", &["a", "b"]);
        let plot = Plot::new(df)
            .aes(Aes::new().x("x").y("y").color("grp"))
            .layer(Layer::new(GeomKind::Point));
        let out = render(&plot).unwrap();
        assert_eq!(out.scene.legends.len(), 1);
        assert_eq!(out.scene.legends[0].title, "grp");
        assert_eq!(out.scene.legends[0].entries.len(), 2);
    }

    #[test]
    fn test_non_numeric_rows_produce_diagnostics() {
        let mut df = DataFrame::new();
        df.add_column(
            "x",
            vec![
                DataValue::Number(1.0),
                DataValue::Number(2.0),
                DataValue::Number(3.0),
            ],
        );
        df.add_column(
            "y",
            vec![
                DataValue::Number(1.0),
                DataValue::Text("bad".into()),
                DataValue::Number(3.0),
            ],
        );
        let plot = Plot::new(df)
            .aes(Aes::new().x("x").y("y"))
            .layer(Layer::new(GeomKind::Point).stat(StatKind::smooth_linear()));
        let out = render(&plot).unwrap();
        assert!(out
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::NonNumeric));
    }
}
