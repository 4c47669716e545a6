/// Hidden coordinates section (for CTF creators).
///
/// Swap the parts below for your own latitude and longitude. Players are
/// nudged toward this file by the crew chat ("numbers", "coordinates")
/// and by the console's `hint` and `trace` commands. A curious player
/// will read the source, or run `strings` on the binary, and land here.

// Example drop point: Madrid approx (latitude 40.4168, longitude -3.7038).
// Replace with your real values.
const DROP_LAT_PARTS: [&str; 3] = ["40", ".", "4168"];
const DROP_LNG_PARTS: [&str; 3] = ["-3", ".", "7038"];

/// Never wired to the UI. A believable "debug helper" left behind for a
/// player to find and read.
#[allow(dead_code)]
pub fn professor_drop_coordinates() -> (String, String) {
    let lat = DROP_LAT_PARTS.concat();
    let lng = DROP_LNG_PARTS.concat();
    (lat, lng)
}

// Another subtle breadcrumb: searching the sources for "drop location"
// lands in this section.
