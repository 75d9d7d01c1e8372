use bitmappr::errors::{MapprError, MapprResult};
use bitmappr::terrain::constants::MAX_GRID_DIMENSION;
use std::str::FromStr;

/// Generic parser for delimited strings that return fixed-size arrays
pub fn parse_delimited<T, const N: usize>(
    input: &str,
    delimiter: char,
    type_name: &str,
) -> MapprResult<[T; N]>
where
    T: Copy + Default + FromStr,
{
    let parts: Vec<&str> = input.split(delimiter).map(str::trim).collect();
    if parts.len() != N {
        return Err(MapprError::InvalidArgument {
            reason: format!(
                "Invalid {type_name} format '{input}'. Expected {N} {delimiter}-separated values"
            ),
        });
    }

    let mut result = [T::default(); N];
    for (i, part) in parts.iter().enumerate() {
        result[i] = part.parse().map_err(|_| MapprError::InvalidArgument {
            reason: format!("Invalid {type_name} value: '{part}'"),
        })?;
    }

    Ok(result)
}

/// Parse size string "WIDTHxHEIGHT" with validation
pub fn parse_size(size_str: &str) -> MapprResult<(u32, u32)> {
    let [width, height] = parse_delimited::<u32, 2>(size_str, 'x', "size")?;

    if width == 0 || height == 0 {
        return Err(MapprError::InvalidArgument {
            reason: "Width and height must be greater than 0".to_string(),
        });
    }

    if width > MAX_GRID_DIMENSION || height > MAX_GRID_DIMENSION {
        return Err(MapprError::InvalidArgument {
            reason: format!("Width and height must not exceed {MAX_GRID_DIMENSION}"),
        });
    }

    Ok((width, height))
}

/// Parse a cell string "X,Y". Bounds are left to the session, which reports them as advisories.
pub fn parse_cell(cell_str: &str) -> MapprResult<(i64, i64)> {
    let [x, y] = parse_delimited::<i64, 2>(cell_str, ',', "cell")?;
    Ok((x, y))
}
