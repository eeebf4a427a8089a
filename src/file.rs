use std::collections::HashMap;
use std::fs;
use std::path::Path;

use nalgebra::Point3;
use thiserror::Error;

use crate::model::{
    BodyInfo, OrbitParams, System, SystemError, MOON_TIME_SCALE, PLANET_TIME_SCALE,
};

// Column layout of a bodies file (whitespace-separated, one header line):
//   name radius color parent orbit_radius orbit_speed spin_speed offset tier pickable
// The root body has `-` in the parent and orbit columns.
const NUM_FIELDS: usize = 10;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("could not read bodies file: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: expected 10 fields, found {found}")]
    FieldCount { line: usize, found: usize },
    #[error("line {line}: could not parse {field} {value:?}")]
    BadNumber {
        line: usize,
        field: &'static str,
        value: String,
    },
    #[error("line {line}: bad color {value:?} (expected 6 hex digits)")]
    BadColor { line: usize, value: String },
    #[error("line {line}: unknown tier {value:?} (expected \"planet\" or \"moon\")")]
    BadTier { line: usize, value: String },
    #[error("line {line}: bad pickable flag {value:?} (expected \"y\" or \"n\")")]
    BadFlag { line: usize, value: String },
    #[error("line {line}: unknown parent {name:?}")]
    UnknownParent { line: usize, name: String },
    #[error("line {line}: {source}")]
    System { line: usize, source: SystemError },
}

pub fn read_file(path: &Path) -> Result<System, ReadError> {
    let mut system = System::new();
    let mut name_to_id = HashMap::new();

    // Read lines, skipping the header
    let text = fs::read_to_string(path)?;
    for (idx, raw_line) in text.lines().enumerate().skip(1) {
        let line = idx + 1;
        if raw_line.trim().is_empty() || raw_line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = raw_line.split_ascii_whitespace().collect();
        if fields.len() != NUM_FIELDS {
            return Err(ReadError::FieldCount {
                line,
                found: fields.len(),
            });
        }

        let name = fields[0];
        let info = BodyInfo {
            name: name.to_owned(),
            radius: parse_number(fields[1], "radius", line)? as f32,
            color: parse_color(fields[2], line)?,
            pickable: parse_flag(fields[9], line)?,
        };
        let spin = parse_number(fields[6], "spin_speed", line)?;

        let parent = fields[3];
        let id = if parent == "-" {
            system
                .add_root(info, spin)
                .map_err(|source| ReadError::System { line, source })?
        } else {
            let parent_id = *name_to_id
                .get(parent)
                .ok_or_else(|| ReadError::UnknownParent {
                    line,
                    name: parent.to_owned(),
                })?;

            let orbit = OrbitParams {
                radius: parse_number(fields[4], "orbit_radius", line)?,
                speed: parse_number(fields[5], "orbit_speed", line)?,
                spin,
                offset: parse_number(fields[7], "offset", line)?,
                time_scale: parse_tier(fields[8], line)?,
            };
            system
                .add_body(info, orbit, parent_id)
                .map_err(|source| ReadError::System { line, source })?
        };
        name_to_id.insert(name.to_owned(), id);
    }

    Ok(system)
}

/// The scene used when no bodies file is given: an emissive sun, two violet
/// planets, and a blue moon around the inner one.
pub fn builtin_system() -> System {
    let mut system = System::new();

    let body = |name: &str, radius: f32, color: Point3<f32>, pickable: bool| BodyInfo {
        name: name.to_owned(),
        radius,
        color,
        pickable,
    };

    let sun = system
        .add_root(body("Sun", 2.0, Point3::new(1.0, 0.8, 0.2), false), 0.5)
        .expect("builtin scene is valid");
    let p1 = system
        .add_body(
            body("P1", 0.6, Point3::new(0.584, 0.169, 1.0), true),
            OrbitParams::planet(5.0, 0.05, 2.5, 0.0),
            sun,
        )
        .expect("builtin scene is valid");
    system
        .add_body(
            body("M1", 0.2, Point3::new(0.169, 0.655, 1.0), false),
            OrbitParams::moon(1.0, 0.2, 2.0, 0.5),
            p1,
        )
        .expect("builtin scene is valid");
    system
        .add_body(
            body("P2", 0.6, Point3::new(0.584, 0.169, 1.0), true),
            OrbitParams::planet(7.5, 0.025, 5.0, 0.0),
            sun,
        )
        .expect("builtin scene is valid");

    system
}

fn parse_number(s: &str, field: &'static str, line: usize) -> Result<f64, ReadError> {
    s.parse::<f64>().map_err(|_| ReadError::BadNumber {
        line,
        field,
        value: s.to_owned(),
    })
}

fn parse_tier(s: &str, line: usize) -> Result<f64, ReadError> {
    match s {
        "planet" => Ok(PLANET_TIME_SCALE),
        "moon" => Ok(MOON_TIME_SCALE),
        _ => Err(ReadError::BadTier {
            line,
            value: s.to_owned(),
        }),
    }
}

fn parse_flag(s: &str, line: usize) -> Result<bool, ReadError> {
    match s {
        "y" => Ok(true),
        "n" => Ok(false),
        _ => Err(ReadError::BadFlag {
            line,
            value: s.to_owned(),
        }),
    }
}

fn parse_color(s: &str, line: usize) -> Result<Point3<f32>, ReadError> {
    let bad_color = || ReadError::BadColor {
        line,
        value: s.to_owned(),
    };
    if s.len() != 6 || !s.is_ascii() {
        return Err(bad_color());
    }

    let r = u8::from_str_radix(&s[0..2], 16).map_err(|_| bad_color())?;
    let g = u8::from_str_radix(&s[2..4], 16).map_err(|_| bad_color())?;
    let b = u8::from_str_radix(&s[4..6], 16).map_err(|_| bad_color())?;

    Ok(Point3::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    fn write_temp(tag: &str, contents: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("solar-scene-{}-{}.txt", tag, std::process::id()));
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    const GOOD_FILE: &str = "\
name radius color parent orbit_radius orbit_speed spin_speed offset tier pickable
Sun 2.0 FFCC33 - - - 0.5 - planet n
P1 0.6 952BFF Sun 5.0 0.05 2.5 0.0 planet y
M1 0.2 2BA7FF P1 1.0 0.2 2.0 0.5 moon n
";

    #[test]
    fn test_read_good_file() {
        let path = write_temp("good", GOOD_FILE);
        let system = read_file(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(system.bodies().count(), 3);
        let p1 = system.bodies().find(|b| b.info.name == "P1").unwrap();
        assert!(p1.info.pickable);
        assert_relative_eq!(system.orbit_of(p1.id).radius, 5.0);
        let m1 = system.bodies().find(|b| b.info.name == "M1").unwrap();
        assert_eq!(system.parent_of(m1.id), Some(p1.id));
        assert_relative_eq!(system.orbit_of(m1.id).time_scale, MOON_TIME_SCALE);
    }

    #[test]
    fn test_unknown_parent_is_an_error() {
        let path = write_temp(
            "orphan",
            "name radius color parent orbit_radius orbit_speed spin_speed offset tier pickable
P1 0.6 952BFF Nope 5.0 0.05 2.5 0.0 planet y
",
        );
        let err = read_file(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(matches!(err, ReadError::UnknownParent { line: 2, .. }));
    }

    #[test]
    fn test_bad_number_is_an_error() {
        let path = write_temp(
            "badnum",
            "name radius color parent orbit_radius orbit_speed spin_speed offset tier pickable
Sun 2.0 FFCC33 - - - fast - planet n
",
        );
        let err = read_file(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(matches!(
            err,
            ReadError::BadNumber {
                field: "spin_speed",
                ..
            }
        ));
    }

    #[test]
    fn test_builtin_scene_shape() {
        let system = builtin_system();
        assert_eq!(system.bodies().count(), 4);
        assert_eq!(system.pickables().count(), 2);
    }
}
