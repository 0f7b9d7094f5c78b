//! Block identifiers placed by the generation strategies of this crate.


/// Internal macro to easily define blocks registry.
macro_rules! blocks {
    (
        $($ident:ident / $id:literal : $name:literal),* $(,)?
    ) => {

        static NAMES: [&'static str; 256] = {
            let mut arr = [""; 256];
            $(arr[$id as usize] = $name;)*
            arr
        };

        $(pub const $ident: u8 = $id;)*

    };
}

blocks! {
    AIR/0:              "air",
    STONE/1:            "stone",
    GRASS/2:            "grass",
    DIRT/3:             "dirt",
    BEDROCK/7:          "bedrock",
    WATER_STILL/9:      "water_still",
    SAND/12:            "sand",
    GRAVEL/13:          "gravel",
    SANDSTONE/24:       "sandstone",
    TALL_GRASS/31:      "tall_grass",
    DANDELION/37:       "dandelion",
    SNOW/78:            "snow",
    ICE/79:             "ice",
    SNOW_BLOCK/80:      "snow_block",
    CLAY/82:            "clay",
    NETHERRACK/87:      "netherrack",
}

/// Find a block name from its id.
#[inline]
pub const fn name(id: u8) -> &'static str {
    NAMES[id as usize]
}
