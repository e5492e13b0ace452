// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Default catalog for a freshly created database.

use garage_booking_domain::{Service, ServiceType};
use garage_booking_persistence::{Persistence, PersistenceError};
use tracing::info;

/// `(type, name, minutes, price)` for each offered service.
const DEFAULT_SERVICES: [(ServiceType, &str, u32, Option<&str>); 7] = [
    (ServiceType::OilChange, "Cambio de aceite", 30, Some("desde 49€")),
    (ServiceType::Diagnosis, "Diagnóstico", 60, None),
    (ServiceType::Maintenance, "Mantenimiento", 90, Some("desde 120€")),
    (ServiceType::Brakes, "Frenos", 60, Some("desde 80€")),
    (ServiceType::Battery, "Batería", 30, None),
    (ServiceType::PreInspection, "Pre-ITV", 60, Some("35€")),
    (ServiceType::Tires, "Neumáticos", 60, None),
];

/// `(name, specialty)` for each technician.
const DEFAULT_TECHNICIANS: [(&str, &str); 3] = [
    ("Carlos Ruiz", "Motor"),
    ("Marta Vidal", "Frenos y suspensión"),
    ("Javier Soto", "Electricidad"),
];

/// Inserts the default services and technicians if the catalog is empty.
///
/// # Errors
///
/// Returns an error if a read or insert fails.
pub fn seed_catalog(persistence: &mut Persistence) -> Result<(), PersistenceError> {
    if persistence.list_active_services()?.is_empty() {
        for (service_type, name, minutes, price) in DEFAULT_SERVICES {
            let service = Service::new(service_type, name, minutes, price.map(String::from))
                .map_err(|e| PersistenceError::InitializationError(e.to_string()))?;
            persistence.insert_service(&service)?;
        }
        info!(count = DEFAULT_SERVICES.len(), "Seeded service catalog");
    }

    if persistence.count_active_technicians()? == 0 {
        for (name, specialty) in DEFAULT_TECHNICIANS {
            persistence.insert_technician(name, specialty, true)?;
        }
        info!(count = DEFAULT_TECHNICIANS.len(), "Seeded technician directory");
    }

    Ok(())
}
