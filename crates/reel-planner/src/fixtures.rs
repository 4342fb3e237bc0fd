use reel_types::{Group, Video};

pub const ENTERTAINMENT: &str = "1";
pub const EDUCATIONAL: &str = "2";
pub const MUSIC: &str = "3";

pub struct Dataset {
    pub groups: Vec<Group>,
    pub videos: Vec<Video>,
}

impl Dataset {
    pub fn new() -> Self {
        let groups = vec![
            group("1", "Feature films", ENTERTAINMENT),
            group("2", "Landmarks", EDUCATIONAL),
            group("3", "Biographies", EDUCATIONAL),
            group("4", "Captain Crab", MUSIC),
        ];
        let videos = vec![
            video("6ZPOFjSBn-g", "Koala Kid", "1", ENTERTAINMENT, 0, 4923),
            video("EZ9tKEs_Fcs", "Landmarks - Kinkaku-ji", "2", EDUCATIONAL, 6, 336),
            video("hDB5S6hYrZ8", "Landmarks - House of Music", "2", EDUCATIONAL, 5, 336),
            video("KUrXteVPWZI", "Landmarks - Syuyumbike Tower", "2", EDUCATIONAL, 4, 344),
            video("387zMh6Zvig", "Landmarks - Temple of Heaven", "2", EDUCATIONAL, 3, 355),
            video("MC6fFNPc6rg", "Landmarks - Kizhi", "2", EDUCATIONAL, 2, 345),
            video("ZPEYwbkUnE4", "Landmarks - Ponte Vecchio", "2", EDUCATIONAL, 1, 343),
            video("GyV3rxnxIQY", "Landmarks - Golden Gate", "2", EDUCATIONAL, 0, 347),
            video("XPwAl48IIH0", "Biographies - Archimedes", "3", EDUCATIONAL, 0, 403),
            video("IE5Goo2XCV0", "Captain Crab - Dreams", "4", MUSIC, 0, 415),
        ];
        Self { groups, videos }
    }

    pub fn video(&self, video_id: &str) -> &Video {
        self.videos
            .iter()
            .find(|v| v.video_id == video_id)
            .expect("fixture video")
    }
}

pub fn group(id: &str, title: &str, category: &str) -> Group {
    Group {
        group_id: id.to_string(),
        title: title.to_string(),
        parent_id: None,
        order: 0,
        category_id: Some(category.to_string()),
    }
}

pub fn video(id: &str, title: &str, parent: &str, category: &str, order: i32, duration: u32) -> Video {
    Video {
        video_id: id.to_string(),
        title: title.to_string(),
        parent_id: Some(parent.to_string()),
        order,
        category_id: Some(category.to_string()),
        duration_sec: duration,
    }
}
