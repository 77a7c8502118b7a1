use std::io::{Read, Write};
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Context, Result};
use iced::widget::{button, column, container, row, scrollable, text, text_input, Column};
use iced::{application, window, Element, Length, Task, Theme};

use crate::data::store::ItemEdit;
use crate::data::{Item, ItemId};

/// Command-line flag that turns the binary into the editor process.
pub const EDITOR_FLAG: &str = "--edit";

/// Free-text row as typed in the dialog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorRow {
    pub id: Option<ItemId>,
    pub name: String,
    pub qty: String,
    pub percentage: String,
}

impl From<&ItemEdit> for EditorRow {
    fn from(edit: &ItemEdit) -> Self {
        Self {
            id: edit.id,
            name: edit.name.clone(),
            qty: edit.qty.to_string(),
            percentage: edit.percentage.to_string(),
        }
    }
}

impl EditorRow {
    fn parse(&self, line: usize) -> Result<ItemEdit, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(format!("Row {line}: name is required"));
        }
        let qty: f64 = self
            .qty
            .trim()
            .parse()
            .map_err(|_| format!("Row {line}: quantity '{}' is not a number", self.qty.trim()))?;
        if !(qty.is_finite() && qty > 0.0) {
            return Err(format!("Row {line}: quantity must be greater than zero"));
        }
        let percentage: f64 = self
            .percentage
            .trim()
            .parse()
            .map_err(|_| format!("Row {line}: percentage '{}' is not a number", self.percentage.trim()))?;
        if !percentage.is_finite() {
            return Err(format!("Row {line}: percentage must be finite"));
        }
        Ok(ItemEdit {
            id: self.id,
            name: name.to_string(),
            qty,
            percentage,
        })
    }
}

/// Validate every row; the first bad row is reported (1-based).
pub fn validate_rows(rows: &[EditorRow]) -> Result<Vec<ItemEdit>, String> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| row.parse(i + 1))
        .collect()
}

/// Line format exchanged with the editor process:
/// `id<TAB>name<TAB>qty<TAB>percentage`, `-` for rows without an id.
pub fn encode_edits(edits: &[ItemEdit]) -> String {
    let mut out = String::new();
    for edit in edits {
        let id = edit.id.map(|id| id.0.to_string()).unwrap_or_else(|| "-".to_string());
        let name: String = edit
            .name
            .chars()
            .map(|c| if c == '\t' || c == '\n' || c == '\r' { ' ' } else { c })
            .collect();
        out.push_str(&format!("{}\t{}\t{}\t{}\n", id, name, edit.qty, edit.percentage));
    }
    out
}

pub fn decode_edits(input: &str) -> Result<Vec<ItemEdit>> {
    input
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(i, line)| {
            let fields: Vec<&str> = line.split('\t').collect();
            let [id, name, qty, percentage] = fields.as_slice() else {
                bail!("line {}: expected 4 tab-separated fields, got {}", i + 1, fields.len());
            };
            let id = match *id {
                "-" => None,
                raw => Some(ItemId(raw.parse().with_context(|| format!("line {}: bad id", i + 1))?)),
            };
            Ok(ItemEdit {
                id,
                name: name.to_string(),
                qty: qty.parse().with_context(|| format!("line {}: bad quantity", i + 1))?,
                percentage: percentage
                    .parse()
                    .with_context(|| format!("line {}: bad percentage", i + 1))?,
            })
        })
        .collect()
}

/// Open the editor in a child process (`<current exe> --edit`) and wait for it.
/// `Ok(None)` when the dialog was cancelled.
pub fn edit_in_child(items: &[Item]) -> Result<Option<Vec<ItemEdit>>> {
    let exe = std::env::current_exe()?;
    let mut child = Command::new(exe)
        .arg(EDITOR_FLAG)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .context("failed to start the item editor")?;

    let edits: Vec<ItemEdit> = items.iter().map(ItemEdit::from).collect();
    child
        .stdin
        .take()
        .ok_or_else(|| anyhow!("editor stdin unavailable"))?
        .write_all(encode_edits(&edits).as_bytes())?;

    let output = child.wait_with_output()?;
    if !output.status.success() {
        bail!("item editor exited with {}", output.status);
    }
    let stdout = String::from_utf8(output.stdout).context("editor output is not UTF-8")?;
    if stdout.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(decode_edits(&stdout)?))
}

/// Entry point of the editor process: rows in on stdin, edited rows out on stdout.
/// Prints nothing when cancelled.
pub fn run_editor_stdio() -> Result<()> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    let rows = decode_edits(&input)?.iter().map(EditorRow::from).collect();

    if let Some(edits) = run_item_editor("Squaremap - Items", rows) {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(encode_edits(&edits).as_bytes())?;
        stdout.flush()?;
    }
    Ok(())
}

/// Run the iced dialog. `None` when cancelled or the window was closed.
pub fn run_item_editor(title: &str, rows: Vec<EditorRow>) -> Option<Vec<ItemEdit>> {
    let output = Arc::new(Mutex::new(None));
    let output_for_app = output.clone();
    let title_owned = title.to_string();

    let run = application(
        move |_state: &ItemEditor| title_owned.clone(),
        move |state: &mut ItemEditor, message: Message| state.update(message),
        view,
    )
    .theme(|_| Theme::Dark)
    .window_size((760.0, 560.0))
    .run_with(move || (ItemEditor::new(rows, output_for_app), Task::none()));

    if let Err(e) = run {
        tracing::error!("Item editor failed: {}", e);
        return None;
    }
    output.lock().ok().and_then(|g| g.clone())
}

#[derive(Debug, Clone)]
enum Message {
    NameChanged(usize, String),
    QtyChanged(usize, String),
    PercentageChanged(usize, String),
    Remove(usize),
    NewNameChanged(String),
    NewQtyChanged(String),
    NewPercentageChanged(String),
    Add,
    Apply,
    Cancel,
}

struct ItemEditor {
    rows: Vec<EditorRow>,
    new_row: EditorRow,
    error: Option<String>,
    output: Arc<Mutex<Option<Vec<ItemEdit>>>>,
}

impl ItemEditor {
    fn new(rows: Vec<EditorRow>, output: Arc<Mutex<Option<Vec<ItemEdit>>>>) -> Self {
        Self {
            rows,
            new_row: EditorRow::default(),
            error: None,
            output,
        }
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::NameChanged(i, value) => {
                if let Some(row) = self.rows.get_mut(i) {
                    row.name = value;
                }
                Task::none()
            }
            Message::QtyChanged(i, value) => {
                if let Some(row) = self.rows.get_mut(i) {
                    row.qty = value;
                }
                Task::none()
            }
            Message::PercentageChanged(i, value) => {
                if let Some(row) = self.rows.get_mut(i) {
                    row.percentage = value;
                }
                Task::none()
            }
            Message::Remove(i) => {
                if i < self.rows.len() {
                    self.rows.remove(i);
                }
                Task::none()
            }
            Message::NewNameChanged(value) => {
                self.new_row.name = value;
                Task::none()
            }
            Message::NewQtyChanged(value) => {
                self.new_row.qty = value;
                Task::none()
            }
            Message::NewPercentageChanged(value) => {
                self.new_row.percentage = value;
                Task::none()
            }
            Message::Add => {
                match self.new_row.parse(self.rows.len() + 1) {
                    Ok(_) => {
                        self.rows.push(std::mem::take(&mut self.new_row));
                        self.error = None;
                    }
                    Err(e) => self.error = Some(e),
                }
                Task::none()
            }
            Message::Apply => match validate_rows(&self.rows) {
                Ok(edits) => {
                    if let Ok(mut guard) = self.output.lock() {
                        *guard = Some(edits);
                    }
                    close_window()
                }
                Err(e) => {
                    self.error = Some(e);
                    Task::none()
                }
            },
            Message::Cancel => close_window(),
        }
    }
}

fn close_window() -> Task<Message> {
    window::get_latest().then(|id| match id {
        Some(id) => window::close::<Message>(id),
        None => Task::none(),
    })
}

fn item_row(i: usize, item: &EditorRow) -> Element<'_, Message> {
    row![
        text_input("Name, e.g. Coca-Cola", &item.name)
            .on_input(move |v| Message::NameChanged(i, v))
            .padding(8)
            .width(Length::FillPortion(3)),
        text_input("Litres sold, e.g. 30000", &item.qty)
            .on_input(move |v| Message::QtyChanged(i, v))
            .padding(8)
            .width(Length::FillPortion(2)),
        text_input("Change %, e.g. 10", &item.percentage)
            .on_input(move |v| Message::PercentageChanged(i, v))
            .padding(8)
            .width(Length::FillPortion(2)),
        button("Remove").on_press(Message::Remove(i))
    ]
    .spacing(8)
    .into()
}

fn view(state: &ItemEditor) -> Element<'_, Message> {
    let mut body = column![text("Items").size(26)].spacing(14);

    let rows = Column::with_children(
        state
            .rows
            .iter()
            .enumerate()
            .map(|(i, item)| item_row(i, item)),
    )
    .spacing(8);
    body = body.push(scrollable(container(rows).padding(12)).height(Length::Fill));

    body = body.push(
        column![
            text("New item").size(18),
            row![
                text_input("Name", &state.new_row.name)
                    .on_input(Message::NewNameChanged)
                    .padding(8)
                    .width(Length::FillPortion(3)),
                text_input("Quantity", &state.new_row.qty)
                    .on_input(Message::NewQtyChanged)
                    .padding(8)
                    .width(Length::FillPortion(2)),
                text_input("Change %", &state.new_row.percentage)
                    .on_input(Message::NewPercentageChanged)
                    .padding(8)
                    .width(Length::FillPortion(2)),
                button("Add").on_press(Message::Add)
            ]
            .spacing(8)
        ]
        .spacing(8),
    );

    if let Some(error) = &state.error {
        body = body.push(text(error.as_str()).size(16));
    }

    body = body.push(
        row![
            button("Cancel").on_press(Message::Cancel),
            button("Apply").on_press(Message::Apply)
        ]
        .spacing(10),
    );

    container(body)
        .padding(16)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
