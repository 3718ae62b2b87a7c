//! Realistic seed data for Conectando Corazones
//!
//! This module provides data that can be used across:
//! - Development server (dev-server)
//! - API and hooks integration tests
//!
//! The data represents a small live deployment:
//! - An administrator who curates the library and the support directory
//! - A mother (Alicia) with calendar events, a week of diary entries and a
//!   weekly summary
//! - The informational FAFORE sections

use crate::{TestApp, book_details, diary_entry, directory_details};
use anyhow::Result;
use jiff::civil::Date;
use jiff::tz::TimeZone;
use payloads::{CalendarEvent, Importance, UserId, dates, responses};

/// Development dataset covering every resource the backend serves
pub struct DevDataset {
    pub admin_id: UserId,
    pub alice_id: UserId,
    pub books: Vec<responses::Book>,
    pub directories: Vec<responses::Directory>,
    pub events: Vec<responses::CalendarEvent>,
    pub entries: Vec<responses::DiaryEntry>,
    pub summary: responses::WeeklySummary,
    pub sections: Vec<responses::FaforeSection>,
}

impl DevDataset {
    /// Creates the complete development dataset relative to the app's "today".
    pub async fn create(app: &TestApp) -> Result<Self> {
        let today = app.time_source.today(&TimeZone::UTC);

        tracing::info!("👤 Creating administrator");
        let admin_id = app.create_admin_user().await?;
        let admin = app.new_client();
        admin.login(&crate::admin_login_credentials()).await?;

        tracing::info!("📚 Creating library and directory");
        let mut books = Vec::new();
        for (titulo, categoria) in [
            ("Crianza con apego", "crianza"),
            ("Cuentos para dormir", "infantil"),
            ("Alimentación en el primer año", "salud"),
            ("Juegos sensoriales en casa", "infantil"),
        ] {
            books.push(admin.create_book(&book_details(titulo, categoria)).await?);
        }
        let mut directories = Vec::new();
        for (nombre, categoria) in [
            ("Centro de Salud Comunitario", "salud"),
            ("Línea de Apoyo Emocional", "apoyo"),
            ("Guardería Pequeños Pasos", "cuidado"),
        ] {
            directories.push(
                admin
                    .create_directory(&directory_details(nombre, categoria))
                    .await?,
            );
        }

        tracing::info!("📖 Creating FAFORE sections");
        let sections = create_fafore_sections(app)?;

        tracing::info!("👩 Creating Alicia with her calendar and diary");
        let alice_id = app.create_alice_user().await?;
        let events = create_events(app, today).await?;
        let entries = create_week_of_entries(app, &alice_id, today).await?;
        let (semana_inicio, _) = dates::week_bounds(today)?;
        let summary = app
            .client
            .create_summary(
                &alice_id,
                &payloads::WeeklySummary {
                    semana_inicio,
                    resumen: "Una semana de muchos aprendizajes".into(),
                    logros: vec!["Retomamos la rutina de sueño".into()],
                    desafios: vec!["Poco tiempo para mí".into()],
                    emocion_predominante: None,
                },
            )
            .await?
            .into_result()?;

        Ok(Self {
            admin_id,
            alice_id,
            books,
            directories,
            events,
            entries,
            summary,
            sections,
        })
    }

    pub fn print_summary(&self) {
        tracing::info!("📋 Development Dataset Summary:");
        tracing::info!("   Admin: {} (admin@example.com)", self.admin_id);
        tracing::info!("   Alicia: {} (alicia@example.com)", self.alice_id);
        tracing::info!("   Books: {}", self.books.len());
        tracing::info!("   Directory entries: {}", self.directories.len());
        tracing::info!("   FAFORE sections: {}", self.sections.len());
        tracing::info!("   Calendar events: {}", self.events.len());
        for event in &self.events {
            tracing::info!(
                "     - {} on {} ({})",
                event.event.titulo,
                event.event.fecha_evento,
                event.event.nivel_importancia
            );
        }
        tracing::info!("   Diary entries: {}", self.entries.len());
        tracing::info!(
            "   Weekly summary: week of {}",
            self.summary.semana_inicio
        );
    }
}

fn create_fafore_sections(
    app: &TestApp,
) -> Result<Vec<responses::FaforeSection>> {
    let sections = [
        (
            "¿Qué es FAFORE?",
            "Un programa de formación para familias que acompaña la crianza \
             en los primeros años.",
        ),
        (
            "Talleres",
            "Sesiones semanales sobre desarrollo infantil, juego y \
             autocuidado.",
        ),
        (
            "Cómo participar",
            "Regístrate en la aplicación y consulta el calendario de \
             actividades.",
        ),
    ];
    let mut created = Vec::new();
    for (orden, (titulo, contenido)) in (1..).zip(sections) {
        created.push(api::store::fafore::create_section(
            &app.store, titulo, contenido, orden,
        )?);
    }
    Ok(created)
}

async fn create_events(
    app: &TestApp,
    today: Date,
) -> Result<Vec<responses::CalendarEvent>> {
    let tomorrow = today.tomorrow()?;
    let next_week = today.checked_add(jiff::Span::new().days(7))?;

    let mut pediatra = CalendarEvent::new("Cita con pediatra", tomorrow, "medica");
    pediatra.hora_inicio = Some(jiff::civil::time(10, 0, 0, 0));
    pediatra.hora_fin = Some(jiff::civil::time(11, 0, 0, 0));
    pediatra.nivel_importancia = Importance::Alta;
    pediatra.recordatorio_activo = true;
    pediatra.ubicacion = Some("Centro de Salud Comunitario".into());

    let mut taller = CalendarEvent::new("Taller FAFORE", next_week, "taller");
    taller.color = "#E24A8D".into();
    taller.hora_inicio = Some(jiff::civil::time(17, 30, 0, 0));

    let paseo = CalendarEvent::new("Paseo al parque", today, "diferente");

    let mut events = Vec::new();
    for event in [pediatra, taller, paseo] {
        events.push(app.client.create_event(&event).await?);
    }
    Ok(events)
}

/// One entry per day from Monday of this week up to today.
async fn create_week_of_entries(
    app: &TestApp,
    alice_id: &UserId,
    today: Date,
) -> Result<Vec<responses::DiaryEntry>> {
    let (monday, _) = dates::week_bounds(today)?;
    let moods = ["Feliz", "Cansada", "Feliz", "Tranquila", "Feliz", "Agradecida", "Feliz"];
    let mut entries = Vec::new();
    for (offset, emocion) in moods.iter().enumerate() {
        let fecha = monday.checked_add(jiff::Span::new().days(offset as i64))?;
        if fecha > today {
            break;
        }
        let entry = diary_entry(fecha, "Hoy aprendimos algo nuevo juntas", emocion);
        entries.push(
            app.client
                .create_entry(alice_id, &entry)
                .await?
                .into_result()?,
        );
    }
    Ok(entries)
}
