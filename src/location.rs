use crate::error::{DexError, Result};
use crate::models::{CatchRequest, Location};

/// Turns the coordinates attached to a catch request into a stored location.
///
/// No coordinates at all means the user caught without location tracking and
/// yields `Ok(None)`. Partial or impossible coordinates are reported as
/// `PermissionDenied` so the caller can fall back to a catch without location.
pub fn resolve(request: &CatchRequest) -> Result<Option<Location>> {
    let (latitude, longitude) = match (request.latitude, request.longitude) {
        (None, None) => return Ok(None),
        (Some(latitude), Some(longitude)) => (latitude, longitude),
        _ => {
            return Err(DexError::permission_denied(
                "location needs both latitude and longitude",
            ))
        }
    };

    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(DexError::permission_denied(format!(
            "latitude {latitude} is out of range"
        )));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(DexError::permission_denied(format!(
            "longitude {longitude} is out of range"
        )));
    }

    let address = request
        .address
        .as_deref()
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .map(str::to_string);

    Ok(Some(Location {
        latitude,
        longitude,
        address,
    }))
}

/// Joins the non-empty parts of a reverse-geocoded place, e.g.
/// `"12 High St, Springfield, Oregon"`.
pub fn format_address(
    street: Option<&str>,
    city: Option<&str>,
    region: Option<&str>,
) -> Option<String> {
    let parts: Vec<&str> = [street, city, region]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}
