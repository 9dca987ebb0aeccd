use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;

#[function_component(NotFound)]
pub fn not_found() -> Html {
    html! {
        <div class="not-found">
            <style>
                {r#"
                .not-found {
                    min-height: 80vh;
                    display: flex;
                    flex-direction: column;
                    align-items: center;
                    justify-content: center;
                    gap: 1rem;
                    text-align: center;
                    padding: 2rem;
                }
                .not-found h1 {
                    font-size: 4rem;
                    color: var(--verde-bosque);
                    margin: 0;
                }
                "#}
            </style>
            <h1>{"404"}</h1>
            <p>{"Esta senda no lleva a ninguna parte."}</p>
            <Link<Route> to={Route::Landing} classes="btn-primary">
                {"Volver al inicio"}
            </Link<Route>>
        </div>
    }
}
