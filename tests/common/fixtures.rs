use script_planner::{
    DocumentSnapshot, Episode, ExportOptions, InterviewField, ObjectiveField, Planner,
    RasterError, RasterImage, Rasterizer,
};

/// Free text with exactly `chars` counted characters.
pub fn hangul_text(chars: usize) -> String {
    let sentence = "소방관은 불길 속으로 들어간다 ";
    let mut out = String::new();
    let mut counted = 0;
    for ch in sentence.chars().cycle() {
        if counted == chars {
            break;
        }
        if !ch.is_whitespace() {
            counted += 1;
        }
        out.push(ch);
    }
    out
}

/// Week 2 planner with every kind of input filled on episode 1.
pub fn filled_planner() -> Planner {
    let mut planner = Planner::new();
    planner.set_week_number("2주차");
    planner.set_week_title("소방관");
    for (idx, keyword) in ["희생정신", "", "팀워크"].iter().enumerate() {
        planner.update_keyword("hook", idx, *keyword);
    }
    planner.update_objective("objectives", ObjectiveField::Goal, "소방관의 역할을 설명할 수 있다.");
    planner.update_script("intro", hangul_text(360));
    planner.update_script("movie", hangul_text(5430));
    planner.select_episode(Episode::Two);
    planner.update_interview("interview", InterviewField::Source, "https://example.com/v");
    planner.select_episode(Episode::One);
    planner
}

/// Rasterizer producing a white image of fixed height.
pub struct BlankRasterizer {
    pub height: u32,
    pub calls: usize,
}

impl BlankRasterizer {
    pub fn new(height: u32) -> Self {
        Self { height, calls: 0 }
    }
}

impl Rasterizer for BlankRasterizer {
    fn rasterize(
        &mut self,
        _snapshot: &DocumentSnapshot,
        options: &ExportOptions,
    ) -> Result<RasterImage, RasterError> {
        self.calls += 1;
        let width = options.raster_width();
        let len = width as usize * self.height as usize * 3;
        RasterImage::from_rgb(width, self.height, vec![0xff; len])
    }
}

/// Rasterizer that always fails.
pub struct BrokenRasterizer;

impl Rasterizer for BrokenRasterizer {
    fn rasterize(
        &mut self,
        _snapshot: &DocumentSnapshot,
        _options: &ExportOptions,
    ) -> Result<RasterImage, RasterError> {
        Err(RasterError::new("canvas unavailable"))
    }
}
