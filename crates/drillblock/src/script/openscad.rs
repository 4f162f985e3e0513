//! OpenSCAD script writer.

use super::{literal, ScriptWriter, SCAD_FILENAME};
use crate::config::Configuration;
use crate::layout::{
    BATCH_SPACING, BOX_DEPTH, BOX_WIDTH, CUTTER_MARGIN, FIRST_HOLE_OFFSET, HOLE_PITCH, HOLE_STEP,
};

/// OpenSCAD script writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenScadWriter;

const BLOCK_ROUTINE: &str = r#"
module cutter(center, axis, length) {
    translate(center)
        rotate(axis == "x" ? [0, 90, 0] : axis == "y" ? [-90, 0, 0] : [0, 0, 0])
            cylinder(r = drill_radius, h = length, center = true);
}

module drill_block(hole_count, offset_x) {
    box_height = hole_count * hole_pitch;
    side = box_width / 2 - groove_depth + drill_radius;
    cap = box_height / 2 - groove_depth + drill_radius;
    translate([offset_x, 0, 0])
    difference() {
        cube([box_width, box_height, box_depth], center = true);
        cutter([0, 0, 0], "y", box_height + cutter_margin);
        for (i = [0 : hole_count - 1]) {
            y = -box_height / 2 + first_hole_offset + i * hole_step;
            cutter([0, y, 0], "x", cross_length);
            cutter([0, y, 0], "z", cross_length);
            if (groove_depth > 0) {
                cutter([side, y, 0], "z", cross_length);
                cutter([-side, y, 0], "z", cross_length);
                cutter([0, y, side], "x", cross_length);
                cutter([0, y, -side], "x", cross_length);
            }
        }
        if (groove_depth > 0) {
            for (y = [cap, -cap]) {
                cutter([0, y, 0], "x", cross_length);
                cutter([0, y, 0], "z", cross_length);
            }
        }
    }
}
"#;

impl ScriptWriter for OpenScadWriter {
    fn filename(&self) -> &'static str {
        SCAD_FILENAME
    }

    fn comment(&self) -> &'static str {
        "//"
    }

    fn header(&self, config: &Configuration) -> String {
        let mut out = String::new();
        out.push_str(&format!("// {SCAD_FILENAME}: generated by drillblock\n"));
        out.push('\n');
        for (name, value) in [
            ("box_width", BOX_WIDTH),
            ("box_depth", BOX_DEPTH),
            ("hole_pitch", HOLE_PITCH),
            ("first_hole_offset", FIRST_HOLE_OFFSET),
            ("hole_step", HOLE_STEP),
            ("batch_spacing", BATCH_SPACING),
            ("cutter_margin", CUTTER_MARGIN),
            ("drill_radius", config.drill_radius),
            ("groove_depth", config.groove_depth),
        ] {
            out.push_str(&format!("{name} = {};\n", literal(value)));
        }
        out.push_str("cross_length = max(box_width, box_depth) + cutter_margin;\n");
        out.push_str(&format!("$fn = {};\n", config.segments));
        let list: Vec<String> = config.hole_counts.iter().map(u32::to_string).collect();
        out.push_str(&format!("batch_list = [{}];\n", list.join(", ")));
        out.push('\n');
        out
    }

    fn block_routine(&self) -> String {
        BLOCK_ROUTINE.to_string()
    }

    fn driver(&self, _config: &Configuration) -> String {
        r#"
for (i = [0 : len(batch_list) - 1])
    drill_block(batch_list[i], i * batch_spacing);

echo(str("Drill block generation complete: ", len(batch_list), " block(s)"));
"#
        .to_string()
    }
}
