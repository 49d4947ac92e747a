//! Line-oriented interactive shell.
//!
//! Reads one command per line, runs it to completion, and writes the result
//! to the output. A form whose save was rejected stays open so the user can
//! fix it with `set` and try again with `submit`.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use timetable_client::TimetableApi;
use timetable_core::error::CoreError;
use timetable_core::filter::EntryFilter;
use timetable_core::models::{Classes, Entries, Subjects, Teachers, TimeSlots};
use timetable_core::resource::Resource;
use timetable_core::types::DbId;
use timetable_core::weekday::{Weekday, SCHOOL_WEEK};

use crate::config::ConsoleConfig;
use crate::dashboard::{self, DashboardCounts, SeedOutcome};
use crate::error::{ConsoleError, ConsoleResult};
use crate::export::export_class;
use crate::panels::{DeleteOutcome, EntityForm, Panel, SaveOutcome};
use crate::prompt::{AssumeYes, Confirm, LineConfirm};
use crate::render;
use crate::timetable::TimetableView;

const HELP: &str = "\
Commands:
  help                                   show this list
  dashboard                              show record counts
  seed                                   load the sample data set
  list <kind>                            list teachers, subjects, classes, timeslots or entries
  add <kind> field=value ...             create a record
  edit <kind> <id> field=value ...       update a listed record
  delete <kind> <id>                     delete a record
  form                                   show the open form (entry forms also
                                         list teacher, subject and class ids)
  set field=value ...                    change fields of the open form
  submit                                 save the open form again
  cancel                                 discard the open form
  timetable [class=..] [teacher=..] [day=..]
                                         filter and show the weekly grid
  slots <day>                            list slots an entry can use on a day
  export [class_id]                      download the class timetable PDF
  quit                                   leave
Values containing spaces can be quoted: name=\"Dr. John Smith\"
";

// ---------------------------------------------------------------------------
// Command parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Teachers,
    Subjects,
    Classes,
    TimeSlots,
    Entries,
}

impl Kind {
    fn plural(self) -> &'static str {
        match self {
            Kind::Teachers => "teachers",
            Kind::Subjects => "subjects",
            Kind::Classes => "classes",
            Kind::TimeSlots => "time slots",
            Kind::Entries => "timetable entries",
        }
    }
}

impl FromStr for Kind {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "teacher" | "teachers" => Ok(Kind::Teachers),
            "subject" | "subjects" => Ok(Kind::Subjects),
            "class" | "classes" => Ok(Kind::Classes),
            "slot" | "slots" | "timeslot" | "timeslots" => Ok(Kind::TimeSlots),
            "entry" | "entries" | "timetable" => Ok(Kind::Entries),
            other => Err(ConsoleError::Usage(format!(
                "Unknown kind '{other}'. Expected teachers, subjects, classes, timeslots or entries"
            ))),
        }
    }
}

pub type Assignments = Vec<(String, String)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    Help,
    Dashboard,
    Seed,
    List(Kind),
    Add { kind: Kind, fields: Assignments },
    Edit { kind: Kind, id: DbId, fields: Assignments },
    Delete { kind: Kind, id: DbId },
    Form,
    Set(Assignments),
    Submit,
    Cancel,
    Timetable(Assignments),
    Slots(Weekday),
    Export(Option<DbId>),
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> ConsoleResult<Self> {
        let tokens = tokenize(line)?;
        let Some((head, args)) = tokens.split_first() else {
            return Ok(Command::Empty);
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "help" | "?" => Command::Help,
            "dashboard" => Command::Dashboard,
            "seed" => Command::Seed,
            "list" | "ls" => Command::List(kind_arg(args, "list <kind>")?),
            "add" => Command::Add {
                kind: kind_arg(args, "add <kind> field=value ...")?,
                fields: assignments(&args[1..])?,
            },
            "edit" => {
                let kind = kind_arg(args, "edit <kind> <id> field=value ...")?;
                let id = id_arg(args.get(1), "edit <kind> <id> field=value ...")?;
                Command::Edit {
                    kind,
                    id,
                    fields: assignments(&args[2..])?,
                }
            }
            "delete" | "rm" => {
                let kind = kind_arg(args, "delete <kind> <id>")?;
                let id = id_arg(args.get(1), "delete <kind> <id>")?;
                Command::Delete { kind, id }
            }
            "form" => Command::Form,
            "set" => Command::Set(assignments(args)?),
            "submit" | "save" => Command::Submit,
            "cancel" => Command::Cancel,
            "timetable" | "grid" => Command::Timetable(assignments(args)?),
            "slots" => {
                let day = args
                    .first()
                    .ok_or_else(|| usage("slots <day>"))?
                    .parse::<Weekday>()?;
                Command::Slots(day)
            }
            "export" => Command::Export(match args.first() {
                Some(raw) => Some(id_arg(Some(raw), "export [class_id]")?),
                None => None,
            }),
            "quit" | "exit" => Command::Quit,
            other => {
                return Err(ConsoleError::Usage(format!(
                    "Unknown command '{other}'. Type `help` for a list of commands"
                )))
            }
        };
        Ok(command)
    }
}

fn usage(form: &str) -> ConsoleError {
    ConsoleError::Usage(format!("Usage: {form}"))
}

fn kind_arg(args: &[String], form: &str) -> ConsoleResult<Kind> {
    args.first().ok_or_else(|| usage(form))?.parse()
}

fn id_arg(arg: Option<&String>, form: &str) -> ConsoleResult<DbId> {
    let raw = arg.ok_or_else(|| usage(form))?;
    match raw.parse::<DbId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ConsoleError::Usage(format!(
            "'{raw}' is not a valid id. Usage: {form}"
        ))),
    }
}

/// Split on whitespace; double quotes group words and are removed.
fn tokenize(line: &str) -> ConsoleResult<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;

    for ch in line.trim().chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quoted {
        return Err(ConsoleError::Usage("Unterminated quote".into()));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

fn assignments(args: &[String]) -> ConsoleResult<Assignments> {
    args.iter()
        .map(|arg| {
            arg.split_once('=')
                .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.to_string()))
                .filter(|(k, _)| !k.is_empty())
                .ok_or_else(|| {
                    ConsoleError::Usage(format!("Expected field=value, got '{arg}'"))
                })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Open forms
// ---------------------------------------------------------------------------

enum OpenForm {
    Teacher(EntityForm<Teachers>),
    Subject(EntityForm<Subjects>),
    Class(EntityForm<Classes>),
    TimeSlot(EntityForm<TimeSlots>),
    Entry(EntityForm<Entries>),
}

impl OpenForm {
    fn apply(&mut self, fields: &[(String, String)]) -> Result<(), CoreError> {
        for (k, v) in fields {
            match self {
                OpenForm::Teacher(form) => form.set(k, v)?,
                OpenForm::Subject(form) => form.set(k, v)?,
                OpenForm::Class(form) => form.set(k, v)?,
                OpenForm::TimeSlot(form) => form.set(k, v)?,
                OpenForm::Entry(form) => form.set(k, v)?,
            }
        }
        Ok(())
    }

    fn render(&self) -> String {
        match self {
            OpenForm::Teacher(form) => render::form(form),
            OpenForm::Subject(form) => render::form(form),
            OpenForm::Class(form) => render::form(form),
            OpenForm::TimeSlot(form) => render::form(form),
            OpenForm::Entry(form) => render::form(form),
        }
    }
}

/// A save outcome with the record reduced to its id.
enum Reported {
    Saved(DbId),
    Rejected,
}

fn report<R: Resource>(outcome: SaveOutcome<R>) -> Reported {
    match outcome {
        SaveOutcome::Saved(record) => Reported::Saved(R::id(&record)),
        SaveOutcome::Invalid(_) | SaveOutcome::Conflict(_) => Reported::Rejected,
    }
}

// ---------------------------------------------------------------------------
// Shell
// ---------------------------------------------------------------------------

pub struct Shell<I: BufRead, O: Write> {
    api: TimetableApi,
    input: I,
    output: O,
    teachers: Panel<Teachers>,
    subjects: Panel<Subjects>,
    classes: Panel<Classes>,
    timeslots: Panel<TimeSlots>,
    entries: Panel<Entries>,
    timetable: TimetableView,
    open_form: Option<OpenForm>,
    assume_yes: bool,
    export_dir: PathBuf,
}

fn confirmer<'a, I: BufRead, O: Write>(
    input: &'a mut I,
    output: &'a mut O,
    assume_yes: bool,
) -> Box<dyn Confirm + 'a> {
    if assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(LineConfirm::new(input, output))
    }
}

impl<I: BufRead, O: Write> Shell<I, O> {
    pub fn new(api: TimetableApi, config: &ConsoleConfig, input: I, output: O) -> Self {
        Self {
            teachers: Panel::new(api.clone()),
            subjects: Panel::new(api.clone()),
            classes: Panel::new(api.clone()),
            timeslots: Panel::new(api.clone()),
            entries: Panel::new(api.clone()),
            timetable: TimetableView::new(api.clone(), &SCHOOL_WEEK, config.row_order),
            api,
            input,
            output,
            open_form: None,
            assume_yes: config.assume_yes,
            export_dir: config.export_dir.clone(),
        }
    }

    /// Read and run commands until `quit` or end of input.
    pub async fn run(&mut self) -> ConsoleResult<()> {
        writeln!(self.output, "Timetable console. Type `help` for commands.")?;
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                break;
            }

            match Command::parse(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => {
                    if let Err(e) = self.execute(command).await {
                        self.report_error(&e)?;
                    }
                }
                Err(e) => self.report_error(&e)?,
            }
        }
        Ok(())
    }

    fn report_error(&mut self, e: &ConsoleError) -> ConsoleResult<()> {
        match e {
            ConsoleError::Usage(_) | ConsoleError::Core(_) => {}
            other => tracing::error!(error = %other, "Command failed"),
        }
        writeln!(self.output, "Error: {e}")?;
        Ok(())
    }

    pub async fn execute(&mut self, command: Command) -> ConsoleResult<()> {
        match command {
            Command::Empty => {}
            Command::Help => write!(self.output, "{HELP}")?,
            Command::Quit => {}
            Command::Dashboard => {
                let counts = DashboardCounts::load(&self.api).await?;
                write!(self.output, "{}", render::counts(&counts))?;
            }
            Command::Seed => {
                let mut confirm = confirmer(&mut self.input, &mut self.output, self.assume_yes);
                let outcome = dashboard::seed(&self.api, confirm.as_mut()).await;
                drop(confirm);
                match outcome {
                    SeedOutcome::Seeded(message) => {
                        writeln!(self.output, "{message}")?;
                        let counts = DashboardCounts::load(&self.api).await?;
                        write!(self.output, "{}", render::counts(&counts))?;
                    }
                    SeedOutcome::Declined => writeln!(self.output, "Cancelled")?,
                    SeedOutcome::Failed(alert) => writeln!(self.output, "{alert}")?,
                }
            }
            Command::List(kind) => self.list(kind).await?,
            Command::Add { kind, fields } => {
                let form = match kind {
                    Kind::Teachers => OpenForm::Teacher(self.teachers.open_create()),
                    Kind::Subjects => OpenForm::Subject(self.subjects.open_create()),
                    Kind::Classes => OpenForm::Class(self.classes.open_create()),
                    Kind::TimeSlots => OpenForm::TimeSlot(self.timeslots.open_create()),
                    Kind::Entries => OpenForm::Entry(self.timetable.open_create_entry()),
                };
                self.open_and_submit(form, &fields).await?;
            }
            Command::Edit { kind, id, fields } => {
                let form = match kind {
                    Kind::Teachers => self.teachers.open_edit(id).map(OpenForm::Teacher),
                    Kind::Subjects => self.subjects.open_edit(id).map(OpenForm::Subject),
                    Kind::Classes => self.classes.open_edit(id).map(OpenForm::Class),
                    Kind::TimeSlots => self.timeslots.open_edit(id).map(OpenForm::TimeSlot),
                    Kind::Entries => match self.timetable.open_edit_entry(id).await {
                        Some(form) => Some(form),
                        None => self.entries.open_edit(id),
                    }
                    .map(OpenForm::Entry),
                };
                let Some(form) = form else {
                    return Err(CoreError::NotFound {
                        entity: singular(kind),
                        id,
                    }
                    .into());
                };
                self.open_and_submit(form, &fields).await?;
            }
            Command::Delete { kind, id } => self.delete(kind, id).await?,
            Command::Form => match &self.open_form {
                Some(form) => {
                    write!(self.output, "{}", form.render())?;
                    if matches!(form, OpenForm::Entry(_)) {
                        self.timetable.reload().await?;
                        let options = self.timetable.entry_options().await;
                        write!(self.output, "{}", render::entry_choices(&options))?;
                    }
                }
                None => writeln!(self.output, "No form is open")?,
            },
            Command::Set(fields) => {
                let form = self
                    .open_form
                    .as_mut()
                    .ok_or_else(|| ConsoleError::Usage("No form is open".into()))?;
                form.apply(&fields)?;
                let rendered = form.render();
                write!(self.output, "{rendered}")?;
            }
            Command::Submit => {
                let form = self
                    .open_form
                    .take()
                    .ok_or_else(|| ConsoleError::Usage("No form is open".into()))?;
                self.submit(form).await?;
            }
            Command::Cancel => {
                if self.open_form.take().is_some() {
                    writeln!(self.output, "Form discarded")?;
                } else {
                    writeln!(self.output, "No form is open")?;
                }
            }
            Command::Timetable(fields) => self.show_timetable(&fields).await?,
            Command::Slots(day) => {
                self.timetable.reload().await?;
                let options = self.timetable.entry_options().await;
                let slots = options.slots_for(day);
                write!(self.output, "{}", render::slot_choices(day, &slots))?;
            }
            Command::Export(class_id) => {
                let class_id = match class_id {
                    Some(id) => id,
                    None => self
                        .timetable
                        .snapshot()
                        .await
                        .grid
                        .export
                        .map(|link| link.class_id)
                        .ok_or_else(|| {
                            ConsoleError::Usage(
                                "Filter the timetable by class first, or pass a class id".into(),
                            )
                        })?,
                };
                let path = export_class(&self.api, class_id, &self.export_dir).await?;
                writeln!(self.output, "Saved {}", path.display())?;
            }
        }
        Ok(())
    }

    async fn list(&mut self, kind: Kind) -> ConsoleResult<()> {
        let empty = format!("No {} found", kind.plural());
        let rendered = match kind {
            Kind::Teachers => render::records(&self.teachers.load().await?, &empty),
            Kind::Subjects => render::records(&self.subjects.load().await?, &empty),
            Kind::Classes => render::records(&self.classes.load().await?, &empty),
            Kind::TimeSlots => render::records(&self.timeslots.load().await?, &empty),
            Kind::Entries => {
                let filter = self.timetable.requested_filter().await;
                self.entries.set_query(filter);
                render::records(&self.entries.load().await?, &empty)
            }
        };
        write!(self.output, "{rendered}")?;
        Ok(())
    }

    async fn delete(&mut self, kind: Kind, id: DbId) -> ConsoleResult<()> {
        let mut confirm = confirmer(&mut self.input, &mut self.output, self.assume_yes);
        let outcome = match kind {
            Kind::Teachers => self.teachers.delete(id, confirm.as_mut()).await,
            Kind::Subjects => self.subjects.delete(id, confirm.as_mut()).await,
            Kind::Classes => self.classes.delete(id, confirm.as_mut()).await,
            Kind::TimeSlots => self.timeslots.delete(id, confirm.as_mut()).await,
            Kind::Entries => self.timetable.delete_entry(id, confirm.as_mut()).await,
        };
        drop(confirm);

        match outcome? {
            DeleteOutcome::Deleted => writeln!(self.output, "Deleted {} #{id}", singular(kind))?,
            DeleteOutcome::Declined => writeln!(self.output, "Cancelled")?,
        }
        Ok(())
    }

    async fn open_and_submit(
        &mut self,
        mut form: OpenForm,
        fields: &[(String, String)],
    ) -> ConsoleResult<()> {
        if self.open_form.take().is_some() {
            writeln!(self.output, "Previous form discarded")?;
        }
        if let Err(e) = form.apply(fields) {
            self.open_form = Some(form);
            return Err(e.into());
        }
        self.submit(form).await
    }

    /// Save the form; keep it open unless the save went through.
    async fn submit(&mut self, form: OpenForm) -> ConsoleResult<()> {
        let (form, result) = match form {
            OpenForm::Teacher(mut f) => {
                let r = self.teachers.save(&mut f).await.map(report);
                (OpenForm::Teacher(f), r)
            }
            OpenForm::Subject(mut f) => {
                let r = self.subjects.save(&mut f).await.map(report);
                (OpenForm::Subject(f), r)
            }
            OpenForm::Class(mut f) => {
                let r = self.classes.save(&mut f).await.map(report);
                (OpenForm::Class(f), r)
            }
            OpenForm::TimeSlot(mut f) => {
                let r = self.timeslots.save(&mut f).await.map(report);
                (OpenForm::TimeSlot(f), r)
            }
            OpenForm::Entry(mut f) => {
                let r = self.timetable.save_entry(&mut f).await.map(report);
                (OpenForm::Entry(f), r)
            }
        };

        match result {
            Ok(Reported::Saved(id)) => {
                writeln!(self.output, "Saved #{id}")?;
            }
            Ok(Reported::Rejected) => {
                write!(self.output, "{}", form.render())?;
                writeln!(self.output, "Fix the form with `set`, then `submit` or `cancel`")?;
                self.open_form = Some(form);
            }
            Err(e) => {
                self.open_form = Some(form);
                return Err(e);
            }
        }
        Ok(())
    }

    async fn show_timetable(&mut self, fields: &[(String, String)]) -> ConsoleResult<()> {
        let mut filter = self.timetable.requested_filter().await;
        for (key, value) in fields {
            filter.set(key, value)?;
        }

        self.timetable.load(filter).await?;
        let snapshot = self.timetable.snapshot().await;
        writeln!(self.output, "{}", describe_filter(&snapshot.filter))?;
        write!(self.output, "{}", render::grid(&snapshot.grid))?;
        Ok(())
    }
}

fn singular(kind: Kind) -> &'static str {
    match kind {
        Kind::Teachers => "teacher",
        Kind::Subjects => "subject",
        Kind::Classes => "class",
        Kind::TimeSlots => "time slot",
        Kind::Entries => "entry",
    }
}

fn describe_filter(filter: &EntryFilter) -> String {
    if filter.is_empty() {
        return "Showing all entries".to_string();
    }
    let mut parts = Vec::new();
    if let Some(class_id) = filter.class_id {
        parts.push(format!("class {class_id}"));
    }
    if let Some(teacher_id) = filter.teacher_id {
        parts.push(format!("teacher {teacher_id}"));
    }
    if let Some(day) = filter.day {
        parts.push(day.to_string());
    }
    format!("Showing {}", parts.join(", "))
}
