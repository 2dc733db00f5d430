//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;

use log::info;

use crate::config::ChainConfig;
use crate::error::Result;
use crate::units::{Field, ReferenceUnit};
use crate::zone::find_clip_labeled;
use crate::{Gain, Level};

/// References a level is usually quoted against, per field
fn usual_references(field: Field) -> &'static [ReferenceUnit] {
    match field {
        Field::Pressure => &[ReferenceUnit::Spl, ReferenceUnit::Pascal],
        Field::Voltage => &[ReferenceUnit::Dbu, ReferenceUnit::Volt],
        Field::Digital => &[ReferenceUnit::FullScale],
    }
}

/// Parse a level and print it in SI units and dB.
pub fn level(text: &str, reference: Option<&str>) -> Result<()> {
    info!("Parsing level: {}", text);

    let level: Level = text.parse()?;
    println!("{}", level);
    println!("{}", level.field().description());

    match reference {
        Some(name) => println!("{:.2} dB re {}", level.db_named(name)?, name),
        None => {
            for reference in usual_references(level.field()) {
                println!("{:.2} dB re {}", level.db(*reference), reference.token());
            }
        }
    }

    Ok(())
}

/// Parse a gain and print it as a ratio and in dB.
pub fn gain(text: &str) -> Result<()> {
    info!("Parsing gain: {}", text);

    let gain: Gain = text.parse()?;
    println!("{}", gain);
    println!("{}", gain.db_label());

    Ok(())
}

/// Report noise, clip and dynamic range for one zone or every zone of a chain.
pub fn chain(path: &Path, zone: Option<i32>) -> Result<()> {
    let config = ChainConfig::load(path)?;
    let structure = config.build()?;
    let clips = config.labeled_clips()?;

    let zones: Vec<i32> = match zone {
        Some(zone) => vec![zone],
        None => (0..structure.zones() as i32).collect(),
    };

    println!("{:-<60}", "");
    for zone in zones {
        let field = structure.field_at(zone)?;
        let noise = structure.system_noise_at_zone(zone)?;
        let clip = structure.system_clip_at_zone(zone)?;
        let range = structure.dynamic_range_at_zone(zone)?;
        println!("Zone {} ({})", zone, field.description());
        println!("  noise floor:   {}", noise.without_zone());
        println!("  clip ceiling:  {}", clip.without_zone());
        println!("  dynamic range: {:.1} dB", range);
    }
    println!("{:-<60}", "");

    if !clips.is_empty() {
        let (label, level) = find_clip_labeled(structure.gains(), &clips)?;
        println!("Clips first: {} ({})", label, level);
    }

    Ok(())
}
