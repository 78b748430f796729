use std::time::Duration;

use eframe::{egui, Frame};
use egui::{Align2, Color32, Context, FontId, Pos2, Rect, Sense, Shape, Stroke, Vec2};

use lln_core::RunReport;
use reqwest::blocking::Client;
use reqwest::StatusCode;

/// Maximum number of points drawn per line; longer series are strided.
const MAX_POINTS: usize = 2_000;

/// REST context holding a reusable blocking HTTP client.
struct RESTContext {
    client: Client,
    base_url: String,
}

impl RESTContext {
    /// Creates a new REST context with a timeout.
    ///
    /// The server address comes from `LLN_SERVER` (default `http://127.0.0.1:5000`).
    fn new() -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::new(30, 0))
            .build()?;
        let base_url = std::env::var("LLN_SERVER").unwrap_or_else(|_| "http://127.0.0.1:5000".to_owned());
        Ok(Self { client, base_url })
    }

    /// Sends a GET request to `/v1/simulate` with query parameters.
    ///
    /// A rejected configuration comes back as the server's message.
    fn get_simulated(&self, params: &[(String, String)]) -> Result<RunReport, String> {
        let response = self.client
            .get(format!("{}/v1/simulate", self.base_url))
            .query(params)
            .send()
            .map_err(|e| format!("Error: {e}"))?;

        if response.status() == StatusCode::BAD_REQUEST {
            return Err(response.text().unwrap_or_else(|e| format!("Error: {e}")));
        }

        response
            .error_for_status()
            .and_then(|r| r.json::<RunReport>())
            .map_err(|e| format!("Error: {e}"))
    }
}

/// One editable row of the population.
struct CategoryRow {
    name: String,
    weight: i64,
}

/// Global UI state (MUST persist between frames in egui).
struct SimulationUI {
    rest: RESTContext,
    rows: Vec<CategoryRow>,
    trials: i64,
    use_seed: bool,
    seed: u64,
    animate: bool,

    report: Option<RunReport>,
    /// Number of trials currently shown (progressive reveal).
    revealed: usize,
    message: Option<String>,
}

impl SimulationUI {
    /// Initializes the UI with the default bag of chips.
    fn new() -> reqwest::Result<Self> {
        Ok(Self {
            rest: RESTContext::new()?,
            rows: vec![
                CategoryRow { name: "verde".into(), weight: 4 },
                CategoryRow { name: "amarelo".into(), weight: 3 },
                CategoryRow { name: "vermelho".into(), weight: 3 },
            ],
            trials: 50,
            use_seed: false,
            seed: 42,
            animate: true,
            report: None,
            revealed: 0,
            message: None,
        })
    }

    /// Builds the query parameters for the API.
    ///
    /// The seed is only sent when the user fixed one.
    fn build_query(&self) -> Vec<(String, String)> {
        let weights = self
            .rows
            .iter()
            .map(|r| format!("{}:{}", r.name.trim(), r.weight))
            .collect::<Vec<_>>()
            .join(",");

        let mut params = vec![
            ("weights".into(), weights),
            ("trials".into(), self.trials.to_string()),
        ];
        if self.use_seed {
            params.push(("seed".into(), self.seed.to_string()));
        }
        params
    }

    /// Performs the simulation request.
    fn get_simulated(&mut self) {
        match self.rest.get_simulated(&self.build_query()) {
            Ok(report) => {
                self.revealed = if self.animate { 1 } else { report.trials };
                self.message = Some(format!("Seed used: {}", report.seed));
                self.report = Some(report);
            }
            Err(e) => {
                self.report = None;
                self.message = Some(e);
            }
        }
    }

    fn settings_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Settings");
        ui.separator();

        let mut remove = None;
        egui::Grid::new("categories_grid")
            .num_columns(3)
            .spacing([10.0, 6.0])
            .show(ui, |ui| {
                ui.label("Category");
                ui.label("Chips");
                ui.end_row();
                for (i, row) in self.rows.iter_mut().enumerate() {
                    ui.add(egui::TextEdit::singleline(&mut row.name).desired_width(100.0));
                    ui.add(egui::DragValue::new(&mut row.weight).range(1..=10_000).speed(1));
                    if ui.small_button("✖").clicked() {
                        remove = Some(i);
                    }
                    ui.end_row();
                }
            });

        if let Some(i) = remove {
            if self.rows.len() > 1 {
                self.rows.remove(i);
            }
        }
        if ui.button("Add category").clicked() {
            self.rows.push(CategoryRow { name: format!("category {}", self.rows.len() + 1), weight: 1 });
        }

        ui.separator();
        ui.horizontal(|ui| {
            ui.label("Number of draws");
            ui.add(egui::DragValue::new(&mut self.trials).range(10..=1_000_000).speed(10));
        });
        ui.horizontal(|ui| {
            ui.checkbox(&mut self.use_seed, "Fixed seed");
            if self.use_seed {
                ui.add(egui::DragValue::new(&mut self.seed));
            }
        });
        ui.checkbox(&mut self.animate, "Animate draws");

        ui.separator();
        if ui.add_sized([200.0, 40.0], egui::Button::new("Simulate")).clicked() {
            self.get_simulated();
        }
        if let Some(message) = &self.message {
            ui.label(message);
        }
    }
}

/// Display color of a category: the chip colors by name, a palette otherwise.
fn category_color(name: &str, index: usize) -> Color32 {
    const PALETTE: [Color32; 6] = [
        Color32::from_rgb(31, 119, 180),
        Color32::from_rgb(148, 103, 189),
        Color32::from_rgb(140, 86, 75),
        Color32::from_rgb(227, 119, 194),
        Color32::from_rgb(23, 190, 207),
        Color32::from_rgb(127, 127, 127),
    ];
    match name {
        "verde" => Color32::from_rgb(0, 150, 0),
        "amarelo" => Color32::from_rgb(230, 180, 0),
        "vermelho" => Color32::from_rgb(210, 0, 0),
        _ => PALETTE[index % PALETTE.len()],
    }
}

/// Draws simulated frequencies (solid) and theoretical probabilities (dashed)
/// for trials `1..=shown`.
fn draw_chart(ui: &mut egui::Ui, report: &RunReport, shown: usize) {
    let size = Vec2::new(ui.available_width(), (ui.available_height() - 120.0).max(200.0));
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let frame = response.rect;
    let plot = Rect::from_min_max(frame.min + Vec2::new(40.0, 10.0), frame.max - Vec2::new(10.0, 30.0));
    let text_color = ui.visuals().text_color();
    let axis = Stroke::new(1.0, text_color);

    // x: trial 1..=trials, y: frequency 0..=1
    let last = report.trials.max(2) as f32;
    let to_screen = |trial: usize, frequency: f64| {
        Pos2::new(
            plot.left() + (trial as f32 - 1.0) / (last - 1.0) * plot.width(),
            plot.bottom() - frequency as f32 * plot.height(),
        )
    };

    painter.line_segment([plot.left_bottom(), plot.right_bottom()], axis);
    painter.line_segment([plot.left_bottom(), plot.left_top()], axis);
    for tick in [0.0, 0.25, 0.5, 0.75, 1.0] {
        let y = plot.bottom() - tick as f32 * plot.height();
        painter.text(Pos2::new(plot.left() - 4.0, y), Align2::RIGHT_CENTER, format!("{tick:.2}"), FontId::proportional(11.0), text_color);
    }
    painter.text(plot.left_bottom() + Vec2::new(0.0, 4.0), Align2::LEFT_TOP, "1", FontId::proportional(11.0), text_color);
    painter.text(plot.right_bottom() + Vec2::new(0.0, 4.0), Align2::RIGHT_TOP, report.trials.to_string(), FontId::proportional(11.0), text_color);
    painter.text(Pos2::new(plot.center().x, plot.bottom() + 4.0), Align2::CENTER_TOP, "Number of draws", FontId::proportional(12.0), text_color);

    let stride = (shown / MAX_POINTS).max(1);
    for (c, (name, series)) in report.names.iter().zip(&report.series).enumerate() {
        let color = category_color(name, c);

        let mut points: Vec<Pos2> = series[..shown.min(series.len())]
            .iter()
            .enumerate()
            .step_by(stride)
            .map(|(i, f)| to_screen(i + 1, *f))
            .collect();
        if let Some(f) = series.get(shown.saturating_sub(1)) {
            points.push(to_screen(shown, *f));
        }
        painter.add(Shape::line(points, Stroke::new(2.0, color)));

        if let Some(probability) = report.theoretical.probability(name) {
            let baseline = [to_screen(1, probability), to_screen(report.trials, probability)];
            painter.extend(Shape::dashed_line(&baseline, Stroke::new(1.5, color), 8.0, 5.0));
        }
    }
}

impl eframe::App for SimulationUI {
    /// UI update loop (called every frame).
    fn update(&mut self, ctx: &Context, _: &mut Frame) {
        egui::SidePanel::left("settings_panel")
            .resizable(true)
            .show(ctx, |ui| self.settings_panel(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Draw simulation - Law of Large Numbers");
            ui.label("Relative frequencies of each category approach their theoretical probabilities as draws accumulate.");

            let Some(report) = &self.report else {
                ui.label("Click Simulate to start");
                return;
            };

            // Reveal the already computed trajectory a few trials per frame
            if self.revealed < report.trials {
                self.revealed = (self.revealed + (report.trials / 120).max(1)).min(report.trials);
                ctx.request_repaint();
            }

            draw_chart(ui, report, self.revealed);

            ui.horizontal_wrapped(|ui| {
                for (c, baseline) in report.theoretical.baselines().iter().enumerate() {
                    let color = category_color(&baseline.name, c);
                    let observed = report.series[c].get(self.revealed.saturating_sub(1)).copied().unwrap_or(0.0);
                    ui.colored_label(
                        color,
                        format!(
                            "{}: theoretical {:.2}%, simulated {:.2}%",
                            baseline.name,
                            baseline.probability * 100.0,
                            observed * 100.0
                        ),
                    );
                }
            });
            ui.label(format!("Trial {} of {}", self.revealed, report.trials));
        });
    }
}

/// Application entry point.
fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 600.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "lln-simulation",
        options,
        Box::new(|_| Ok(Box::new(SimulationUI::new()?))),
    )
}
