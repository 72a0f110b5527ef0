// src/generator/landmass.rs

/// Countries with the largest land area, by SVG name. The map-based
/// generators only highlight these so the answer is visible on a world map.
pub const TOP_LANDMASS: [&str; 51] = [
    "Russia",
    "Canada",
    "China",
    "United States",
    "Brazil",
    "Australia",
    "India",
    "Argentina",
    "Kazakhstan",
    "Algeria",
    "Democratic Republic of the Congo",
    "Denmark",
    "Saudi Arabia",
    "Mexico",
    "Indonesia",
    "Sudan",
    "Libya",
    "Iran",
    "Mongolia",
    "Peru",
    "Chad",
    "Niger",
    "Angola",
    "Mali",
    "South Africa",
    "Colombia",
    "Ethiopia",
    "Bolivia",
    "Mauritania",
    "Egypt",
    "Tanzania",
    "Nigeria",
    "Venezuela",
    "Pakistan",
    "Namibia",
    "Mozambique",
    "Turkey",
    "Chile",
    "Zambia",
    "Myanmar",
    "Afghanistan",
    "Somalia",
    "Central African Republic",
    "South Sudan",
    "Ukraine",
    "Madagascar",
    "Botswana",
    "Kenya",
    "France",
    "Yemen",
    "New Zealand",
];
