//! Rhino Python (`rhinoscriptsyntax`) script writer.

use super::{literal, ScriptWriter, SCRIPT_FILENAME};
use crate::config::Configuration;
use crate::layout::{
    BATCH_SPACING, BOX_DEPTH, BOX_WIDTH, CUTTER_MARGIN, FIRST_HOLE_OFFSET, HOLE_PITCH, HOLE_STEP,
};

/// Rhino Python script writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RhinoPythonWriter;

const BLOCK_ROUTINE: &str = r#"

def add_cylinder(center, axis, length):
    base = [center[i] - axis[i] * length / 2.0 for i in range(3)]
    plane = rs.PlaneFromNormal(base, axis)
    return rs.AddCylinder(plane, length, DRILL_RADIUS)


def add_centered_box(cx, width, height, depth):
    x0, x1 = cx - width / 2.0, cx + width / 2.0
    y0, y1 = -height / 2.0, height / 2.0
    z0, z1 = -depth / 2.0, depth / 2.0
    corners = [
        (x0, y0, z0), (x1, y0, z0), (x1, y1, z0), (x0, y1, z0),
        (x0, y0, z1), (x1, y0, z1), (x1, y1, z1), (x0, y1, z1),
    ]
    return rs.AddBox(corners)


def make_block(hole_count, offset_x):
    box_height = hole_count * HOLE_PITCH
    block = add_centered_box(offset_x, BOX_WIDTH, box_height, BOX_DEPTH)
    cutters = [add_cylinder((offset_x, 0.0, 0.0), AXIS_Y, box_height + CUTTER_MARGIN)]
    side = BOX_WIDTH / 2.0 - GROOVE_DEPTH + DRILL_RADIUS
    for i in range(hole_count):
        y = -box_height / 2.0 + FIRST_HOLE_OFFSET + i * HOLE_STEP
        cutters.append(add_cylinder((offset_x, y, 0.0), AXIS_X, CROSS_LENGTH))
        cutters.append(add_cylinder((offset_x, y, 0.0), AXIS_Z, CROSS_LENGTH))
        if GROOVE_DEPTH > 0:
            cutters.append(add_cylinder((offset_x + side, y, 0.0), AXIS_Z, CROSS_LENGTH))
            cutters.append(add_cylinder((offset_x - side, y, 0.0), AXIS_Z, CROSS_LENGTH))
            cutters.append(add_cylinder((offset_x, y, side), AXIS_X, CROSS_LENGTH))
            cutters.append(add_cylinder((offset_x, y, -side), AXIS_X, CROSS_LENGTH))
    if GROOVE_DEPTH > 0:
        cap = box_height / 2.0 - GROOVE_DEPTH + DRILL_RADIUS
        for y in (cap, -cap):
            cutters.append(add_cylinder((offset_x, y, 0.0), AXIS_X, CROSS_LENGTH))
            cutters.append(add_cylinder((offset_x, y, 0.0), AXIS_Z, CROSS_LENGTH))
    return rs.BooleanDifference([block], cutters)

"#;

impl ScriptWriter for RhinoPythonWriter {
    fn filename(&self) -> &'static str {
        SCRIPT_FILENAME
    }

    fn comment(&self) -> &'static str {
        "#"
    }

    fn header(&self, config: &Configuration) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {SCRIPT_FILENAME}: generated by drillblock\n"));
        out.push_str("import rhinoscriptsyntax as rs\n");
        out.push('\n');
        for (name, value) in [
            ("BOX_WIDTH", BOX_WIDTH),
            ("BOX_DEPTH", BOX_DEPTH),
            ("HOLE_PITCH", HOLE_PITCH),
            ("FIRST_HOLE_OFFSET", FIRST_HOLE_OFFSET),
            ("HOLE_STEP", HOLE_STEP),
            ("BATCH_SPACING", BATCH_SPACING),
            ("CUTTER_MARGIN", CUTTER_MARGIN),
            ("DRILL_RADIUS", config.drill_radius),
            ("GROOVE_DEPTH", config.groove_depth),
        ] {
            out.push_str(&format!("{name} = {}\n", literal(value)));
        }
        out.push_str("CROSS_LENGTH = max(BOX_WIDTH, BOX_DEPTH) + CUTTER_MARGIN\n");
        out.push_str("AXIS_X, AXIS_Y, AXIS_Z = (1, 0, 0), (0, 1, 0), (0, 0, 1)\n");
        let list: Vec<String> = config.hole_counts.iter().map(u32::to_string).collect();
        out.push_str(&format!("BATCH_LIST = [{}]\n", list.join(", ")));
        out.push('\n');
        out
    }

    fn block_routine(&self) -> String {
        BLOCK_ROUTINE.to_string()
    }

    fn driver(&self, _config: &Configuration) -> String {
        r#"
def main():
    for index, hole_count in enumerate(BATCH_LIST):
        make_block(hole_count, index * BATCH_SPACING)
    print("Drill block generation complete: %d block(s)" % len(BATCH_LIST))


main()
"#
        .to_string()
    }
}
