//! KiCad export settings for each manufacturer.
//!
//! The archive builder matches files purely by name, so the plot and drill
//! dialogs have to be set up to produce the names a vendor expects.

use std::fmt::Write;

use crate::gerber::Vendor;

struct PlotSettings {
    kicad: &'static str,
    protel_extensions: bool,
    extra_layers: &'static [&'static str],
}

const fn plot_settings(vendor: Vendor) -> PlotSettings {
    match vendor {
        Vendor::SeedStudio => PlotSettings {
            kicad: "KiCad 5 or later",
            protel_extensions: true,
            extra_layers: &["Dwgs.User"],
        },
        Vendor::PcbWay => PlotSettings {
            kicad: "KiCad 5 or later",
            protel_extensions: false,
            extra_layers: &[],
        },
        Vendor::JlcPcbV5 => PlotSettings {
            kicad: "KiCad 5",
            protel_extensions: false,
            extra_layers: &[],
        },
        Vendor::JlcPcbV6 => PlotSettings {
            kicad: "KiCad 6 or later",
            protel_extensions: true,
            extra_layers: &[],
        },
    }
}

fn tick(on: bool) -> &'static str {
    if on {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Returns the KiCad plot, drill and assembly export settings for `vendor`.
#[must_use]
pub fn setup_instructions(vendor: Vendor) -> String {
    let plot = plot_settings(vendor);
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "{} ({})", vendor.label(), plot.kicad);
    let _ = writeln!(out);
    let _ = writeln!(out, "File > Plot");
    let _ = writeln!(out, "  Plot format:                         Gerber");
    let _ = writeln!(out, "  Output directory:                    the project directory");
    let _ = writeln!(
        out,
        "  {} Use Protel filename extensions",
        tick(plot.protel_extensions)
    );
    let _ = writeln!(out, "  [ ] Use extended X2 format");
    let _ = writeln!(out, "  [x] Check zone fills before plotting");
    let _ = writeln!(out, "  [ ] Subtract soldermask from silkscreen");
    if !plot.extra_layers.is_empty() {
        let _ = writeln!(out, "  Also plot: {}", plot.extra_layers.join(", "));
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "File > Plot > Generate Drill Files");
    let _ = writeln!(out, "  Drill file format:                   Excellon");
    let _ = writeln!(out, "  [ ] Mirror Y axis");
    let _ = writeln!(out, "  [ ] Minimal header");
    let _ = writeln!(out, "  [x] PTH and NPTH in single file");
    let _ = writeln!(out, "  Drill origin:                        Absolute");
    let _ = writeln!(out, "  Drill units:                         Millimeters");
    let _ = writeln!(out, "  Zeros format:                        Decimal format");
    let _ = writeln!(out, "  Map file format:                     none");
    let _ = writeln!(out);
    let _ = writeln!(out, "Files pcbzip expects (in stacking order):");
    for suffix in vendor.required_suffixes() {
        let _ = writeln!(out, "  *{suffix}");
    }

    if matches!(vendor, Vendor::JlcPcbV5 | Vendor::JlcPcbV6) {
        let _ = writeln!(out);
        let _ = writeln!(out, "Assembly files (pcbzip assembly):");
        let _ = writeln!(
            out,
            "  Tools > Generate BOM:                <project>.csv with \"Comment\",\"Designator\",\"Footprint\" columns"
        );
        let _ = writeln!(
            out,
            "  File > Fabrication Outputs > Footprint Position: CSV, millimeters, separate files for front and back"
        );
        let _ = writeln!(
            out,
            "                                       <project>-top-pos.csv and <project>-bottom-pos.csv"
        );
    }
    out
}
