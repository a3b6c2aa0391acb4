use actix_web::{HttpResponse, Responder, ResponseError, get, post, web};
use chrono::Local;
use log::warn;

use crate::adapters::web::errors::ApiError;
use crate::adapters::web::schema::PeriodFilter;
use crate::use_cases::dto::PaymentsQuery;
use crate::use_cases::get_payments_summary::GetPaymentsSummaryUseCase;
use crate::use_cases::list_payments::ListPaymentsUseCase;
use crate::use_cases::refresh_payments::RefreshPaymentsUseCase;

fn query_for(filter: &PeriodFilter) -> PaymentsQuery {
	PaymentsQuery {
		selection: filter.selection(),
		now:       Local::now().naive_local(),
	}
}

#[get("/payments")]
pub async fn payments(
	filter: web::Query<PeriodFilter>,
	list_payments_use_case: web::Data<ListPaymentsUseCase>,
) -> impl Responder {
	match list_payments_use_case.execute(query_for(&filter)) {
		Ok(result) => HttpResponse::Ok().json(result),
		Err(e) => {
			warn!("Rejected payments query {filter:?}: {e}");
			ApiError::from(e).error_response()
		}
	}
}

#[get("/payments-summary")]
pub async fn payments_summary(
	filter: web::Query<PeriodFilter>,
	get_payments_summary_use_case: web::Data<GetPaymentsSummaryUseCase>,
) -> impl Responder {
	match get_payments_summary_use_case.execute(query_for(&filter)) {
		Ok(summary) => HttpResponse::Ok().json(summary),
		Err(e) => {
			warn!("Rejected payments summary query {filter:?}: {e}");
			ApiError::from(e).error_response()
		}
	}
}

#[post("/payments/refresh")]
pub async fn refresh_payments(
	refresh_payments_use_case: web::Data<RefreshPaymentsUseCase>,
) -> impl Responder {
	refresh_payments_use_case.execute();
	HttpResponse::Accepted().body("Payments refresh started")
}
