//! Reader for NRRD volumes with an attached header.
//!
//! Supports the subset a parcellation label volume needs: 3-D, raw
//! encoding, integer sample types up to 32 bits.  Everything else is
//! rejected as unsupported rather than misread.

use std::io::{BufRead, BufReader, Read};

use crate::{ReadError, Volume};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum SampleType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
}

impl SampleType {
    fn byte_count(self) -> usize {
        match self {
            SampleType::I8 | SampleType::U8 => 1,
            SampleType::I16 | SampleType::U16 => 2,
            SampleType::I32 | SampleType::U32 => 4,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Endianness {
    Little,
    Big,
}

pub fn load<R: Read>(reader: &mut R) -> Result<Volume, ReadError> {
    let mut reader = BufReader::new(reader);

    let mut line = String::new();
    reader.read_line(&mut line)?;
    if !line.starts_with("NRRD") {
        return Err(ReadError::UnknownFormat);
    }

    let mut dimension: Option<usize> = None;
    let mut sizes: Option<Vec<usize>> = None;
    let mut sample_type: Option<SampleType> = None;
    let mut encoding: Option<String> = None;
    let mut endianness = Endianness::Little;

    // Header: one field per line, terminated by a blank line.
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            // Header never ended, so there can be no data.
            return Err(ReadError::UnknownFormat);
        }
        let trimmed = line.trim_end_matches(|c| c == '\r' || c == '\n');
        if trimmed.is_empty() {
            break;
        }
        if trimmed.starts_with('#') || trimmed.contains(":=") {
            // Comments and key/value metadata carry no layout information.
            continue;
        }

        let (field, value) = match trimmed.split_once(':') {
            Some((field, value)) => (field.trim(), value.trim()),
            None => return Err(ReadError::UnknownFormat),
        };

        match field {
            "dimension" => {
                dimension = Some(value.parse().map_err(|_| ReadError::UnknownFormat)?);
            }
            "sizes" => {
                let parsed: Result<Vec<usize>, _> =
                    value.split_whitespace().map(|v| v.parse()).collect();
                sizes = Some(parsed.map_err(|_| ReadError::UnknownFormat)?);
            }
            "type" => {
                sample_type = Some(parse_sample_type(value)?);
            }
            "encoding" => {
                encoding = Some(value.into());
            }
            "endian" => {
                endianness = match value {
                    "little" => Endianness::Little,
                    "big" => Endianness::Big,
                    _ => return Err(ReadError::UnknownFormat),
                };
            }
            "data file" | "datafile" => {
                // Detached data files.
                return Err(ReadError::UnsupportedFeature);
            }
            _ => {
                // Orientation, spacing, and the rest don't affect voxel
                // ids; skip them.
            }
        }
    }

    if dimension != Some(3) {
        return Err(ReadError::UnsupportedFeature);
    }
    match encoding.as_deref() {
        Some("raw") => {}
        Some(_) => return Err(ReadError::UnsupportedFeature),
        None => return Err(ReadError::UnknownFormat),
    }
    let sample_type = sample_type.ok_or(ReadError::UnknownFormat)?;
    let sizes = sizes.ok_or(ReadError::UnknownFormat)?;
    if sizes.len() != 3 || sizes.contains(&0) {
        return Err(ReadError::UnsupportedFeature);
    }

    let voxel_count = sizes[0]
        .checked_mul(sizes[1])
        .and_then(|n| n.checked_mul(sizes[2]))
        .ok_or(ReadError::UnsupportedFeature)?;
    let byte_count = voxel_count
        .checked_mul(sample_type.byte_count())
        .ok_or(ReadError::UnsupportedFeature)?;

    let mut data = vec![0u8; byte_count];
    reader.read_exact(&mut data)?;

    Ok(Volume {
        dimensions: [sizes[0], sizes[1], sizes[2]],
        voxels: widen_samples(&data, sample_type, endianness),
    })
}

fn parse_sample_type(value: &str) -> Result<SampleType, ReadError> {
    match value {
        "signed char" | "int8" | "int8_t" => Ok(SampleType::I8),
        "uchar" | "unsigned char" | "uint8" | "uint8_t" => Ok(SampleType::U8),
        "short" | "short int" | "signed short" | "signed short int" | "int16" | "int16_t" => {
            Ok(SampleType::I16)
        }
        "ushort" | "unsigned short" | "unsigned short int" | "uint16" | "uint16_t" => {
            Ok(SampleType::U16)
        }
        "int" | "signed int" | "int32" | "int32_t" => Ok(SampleType::I32),
        "uint" | "unsigned int" | "uint32" | "uint32_t" => Ok(SampleType::U32),

        // Floats, 64-bit ints, and blocks aren't label volumes.
        _ => Err(ReadError::UnsupportedFeature),
    }
}

fn widen_samples(data: &[u8], sample_type: SampleType, endianness: Endianness) -> Vec<i32> {
    use Endianness::*;
    use SampleType::*;

    match (sample_type, endianness) {
        (I8, _) => data.iter().map(|&b| b as i8 as i32).collect(),
        (U8, _) => data.iter().map(|&b| b as i32).collect(),
        (I16, Little) => chunks2(data)
            .map(|b| i16::from_le_bytes(b) as i32)
            .collect(),
        (I16, Big) => chunks2(data)
            .map(|b| i16::from_be_bytes(b) as i32)
            .collect(),
        (U16, Little) => chunks2(data)
            .map(|b| u16::from_le_bytes(b) as i32)
            .collect(),
        (U16, Big) => chunks2(data)
            .map(|b| u16::from_be_bytes(b) as i32)
            .collect(),
        (I32, Little) => chunks4(data).map(i32::from_le_bytes).collect(),
        (I32, Big) => chunks4(data).map(i32::from_be_bytes).collect(),
        (U32, Little) => chunks4(data)
            .map(|b| u32::from_le_bytes(b) as i32)
            .collect(),
        (U32, Big) => chunks4(data)
            .map(|b| u32::from_be_bytes(b) as i32)
            .collect(),
    }
}

fn chunks2(data: &[u8]) -> impl Iterator<Item = [u8; 2]> + '_ {
    data.chunks_exact(2).map(|c| [c[0], c[1]])
}

fn chunks4(data: &[u8]) -> impl Iterator<Item = [u8; 4]> + '_ {
    data.chunks_exact(4).map(|c| [c[0], c[1], c[2], c[3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nrrd(header: &str, payload: &[u8]) -> Vec<u8> {
        let mut file = Vec::new();
        file.extend_from_slice(b"NRRD0004\n");
        file.extend_from_slice(header.as_bytes());
        file.extend_from_slice(b"\n");
        file.extend_from_slice(payload);
        file
    }

    #[test]
    fn uint8_raw() {
        let file = nrrd(
            "# label volume\ntype: uchar\ndimension: 3\nsizes: 2 2 1\nencoding: raw\n",
            &[1, 2, 3, 4],
        );
        let volume = load(&mut file.as_slice()).unwrap();
        assert_eq!(volume.dimensions, [2, 2, 1]);
        assert_eq!(volume.voxels, vec![1, 2, 3, 4]);
    }

    #[test]
    fn int16_big_endian() {
        let file = nrrd(
            "type: short\ndimension: 3\nsizes: 2 1 1\nencoding: raw\nendian: big\n",
            &[0x01, 0x00, 0xff, 0xff],
        );
        let volume = load(&mut file.as_slice()).unwrap();
        assert_eq!(volume.voxels, vec![256, -1]);
    }

    #[test]
    fn uint32_little_endian() {
        let file = nrrd(
            "type: uint\ndimension: 3\nsizes: 1 1 1\nencoding: raw\nendian: little\n",
            &[0x2a, 0, 0, 0],
        );
        let volume = load(&mut file.as_slice()).unwrap();
        assert_eq!(volume.voxels, vec![42]);
    }

    #[test]
    fn key_value_lines_are_skipped() {
        let file = nrrd(
            "type: uchar\ndimension: 3\nsizes: 1 1 1\nencoding: raw\nsegment0:=cortex\n",
            &[7],
        );
        assert_eq!(load(&mut file.as_slice()).unwrap().voxels, vec![7]);
    }

    #[test]
    fn bad_magic_is_unknown_format() {
        let file = b"P5\n2 2\n255\n";
        assert!(matches!(
            load(&mut file.as_slice()),
            Err(ReadError::UnknownFormat)
        ));
    }

    #[test]
    fn gzip_encoding_is_unsupported() {
        let file = nrrd(
            "type: uchar\ndimension: 3\nsizes: 1 1 1\nencoding: gzip\n",
            &[0],
        );
        assert!(matches!(
            load(&mut file.as_slice()),
            Err(ReadError::UnsupportedFeature)
        ));
    }

    #[test]
    fn float_samples_are_unsupported() {
        let file = nrrd(
            "type: float\ndimension: 3\nsizes: 1 1 1\nencoding: raw\n",
            &[0, 0, 0, 0],
        );
        assert!(matches!(
            load(&mut file.as_slice()),
            Err(ReadError::UnsupportedFeature)
        ));
    }

    #[test]
    fn non_3d_is_unsupported() {
        let file = nrrd(
            "type: uchar\ndimension: 2\nsizes: 2 2\nencoding: raw\n",
            &[0, 0, 0, 0],
        );
        assert!(matches!(
            load(&mut file.as_slice()),
            Err(ReadError::UnsupportedFeature)
        ));
    }

    #[test]
    fn truncated_payload_is_an_io_error() {
        let file = nrrd(
            "type: uchar\ndimension: 3\nsizes: 2 2 2\nencoding: raw\n",
            &[1, 2, 3],
        );
        assert!(matches!(load(&mut file.as_slice()), Err(ReadError::IO(_))));
    }

    #[test]
    fn missing_header_terminator_is_unknown_format() {
        let file = b"NRRD0004\ntype: uchar\ndimension: 3\n";
        assert!(matches!(
            load(&mut file.as_slice()),
            Err(ReadError::UnknownFormat)
        ));
    }
}
